pub mod verify;

pub use verify::user_verify_put;
