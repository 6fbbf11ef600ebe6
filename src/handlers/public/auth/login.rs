use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::AccountService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - Authenticate and receive a token pair
///
/// Email is the login identifier. On success the response carries a
/// short-lived access token (to be sent as `Authorization: Bearer`) and a
/// longer-lived refresh token for POST /auth/refresh.
pub async fn login_post(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let service = AccountService::new().await?;
    let session = service.login(&payload.email, &payload.password).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "user": super::user_body(&session.user, session.profile),
            "tokens": super::token_body(&session.tokens),
        }
    })))
}
