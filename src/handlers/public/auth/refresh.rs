use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::AccountService;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// POST /auth/refresh - Rotate a refresh token
///
/// The presented token is revoked and a new access + refresh pair issued.
/// A revoked, expired or unknown token yields 401, never a new credential.
pub async fn refresh_post(Json(payload): Json<RefreshRequest>) -> Result<Json<Value>, ApiError> {
    let service = AccountService::new().await?;
    let tokens = service.refresh(&payload.refresh).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "tokens": super::token_body(&tokens),
        }
    })))
}
