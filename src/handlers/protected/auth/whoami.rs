use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::middleware::AuthUser;

/// GET /api/auth/whoami - Identity claims of the presented access token
pub async fn session_whoami(Extension(auth_user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "id": auth_user.id,
            "email": auth_user.email,
            "username": auth_user.username,
        }
    }))
}
