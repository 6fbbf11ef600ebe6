// Handlers are organized by security tier:
// public (no auth, /auth/*) → protected (bearer JWT, /api/*) →
// elevated (bearer JWT + staff flag, /api/admin/*)
pub mod elevated;
pub mod protected;
pub mod public;
