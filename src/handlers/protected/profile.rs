use axum::{response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::manager::DatabaseManager;
use crate::database::models::ProfileBody;
use crate::database::profiles::{ProfileChanges, ProfileRepository};
use crate::error::ApiError;
use crate::middleware::AuthUser;

const FULL_NAME_MAX_LENGTH: usize = 100;
const BIO_MAX_LENGTH: usize = 500;

/// GET /api/profile - The caller's profile merged with identity fields
pub async fn profile_get(
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = ProfileRepository::new(pool)
        .find_by_user_id(auth_user.id)
        .await?
        .ok_or_else(|| {
            tracing::error!("No profile exists for user {}", auth_user.id);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "email": auth_user.email,
            "username": auth_user.username,
            "full_name": profile.full_name,
            "bio": profile.bio,
            "image": profile.image,
            "verified": profile.verified,
        }
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// PATCH /api/profile - Update the caller's display metadata
///
/// `verified` is operator-only and not accepted here.
pub async fn profile_patch(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut field_errors = HashMap::new();
    if payload.full_name.as_deref().is_some_and(|v| v.len() > FULL_NAME_MAX_LENGTH) {
        field_errors.insert(
            "full_name".to_string(),
            "Full name must be at most 100 characters".to_string(),
        );
    }
    if payload.bio.as_deref().is_some_and(|v| v.len() > BIO_MAX_LENGTH) {
        field_errors.insert(
            "bio".to_string(),
            "Bio must be at most 500 characters".to_string(),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Validation failed", Some(field_errors)));
    }

    let changes = ProfileChanges {
        full_name: payload.full_name,
        bio: payload.bio,
        image: payload.image,
    };

    let pool = DatabaseManager::pool().await?;
    let profile = ProfileRepository::new(pool)
        .update_own(auth_user.id, &changes)
        .await?
        .ok_or_else(|| {
            tracing::error!("No profile exists for user {}", auth_user.id);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;

    Ok(Json(json!({
        "success": true,
        "data": ProfileBody::from(profile),
    })))
}
