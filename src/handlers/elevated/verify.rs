use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::profiles::ProfileRepository;
use crate::database::users::UserRepository;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub verified: bool,
}

/// PUT /api/admin/users/:id/verify - Toggle a profile's verified flag
///
/// Staff only. The flag is checked against the caller's current user row,
/// not the token, so revoking staff access takes effect immediately.
pub async fn user_verify_put(
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let caller = UserRepository::new(pool.clone())
        .find_by_id(auth_user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    if !caller.is_staff {
        return Err(ApiError::forbidden("Staff access required"));
    }

    let profile = ProfileRepository::new(pool)
        .set_verified(user_id, payload.verified)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(
        "Staff user {} set verified={} for user {}",
        caller.email,
        profile.verified,
        user_id
    );

    Ok(Json(json!({
        "success": true,
        "data": {
            "user_id": user_id,
            "verified": profile.verified,
        }
    })))
}
