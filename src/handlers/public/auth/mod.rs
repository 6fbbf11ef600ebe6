// Token acquisition endpoints that do not require authentication.

use serde_json::{json, Value};

use crate::auth::TokenPair;
use crate::database::models::{Profile, ProfileBody, User};

pub mod login;
pub mod refresh;
pub mod register;

pub use login::login_post;
pub use refresh::refresh_post;
pub use register::register_post;

/// Public representation of a user: identity fields plus profile,
/// never the password hash.
pub(crate) fn user_body(user: &User, profile: Profile) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "username": user.username,
        "profile": ProfileBody::from(profile),
    })
}

pub(crate) fn token_body(tokens: &TokenPair) -> Value {
    json!({
        "access": tokens.access,
        "refresh": tokens.refresh,
        "expires_in": tokens.access_expires_in,
    })
}
