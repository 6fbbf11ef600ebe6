use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::account_service::RegisterRequest;
use crate::services::AccountService;

/// POST /auth/register - Create a new account
///
/// Validates email/username/password shape and uniqueness, then creates the
/// user and its profile atomically and returns an initial session.
pub async fn register_post(
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let service = AccountService::new().await?;
    let session = service.register(&payload).await?;

    tracing::info!("Registered new user {}", session.user.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "message": "User registered successfully",
                "user": super::user_body(&session.user, session.profile),
                "tokens": super::token_body(&session.tokens),
            }
        })),
    ))
}
