use axum::{extract::Path, response::Json, Extension};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{parse_priority, parse_status, validate_category, validate_title, TodoBody};
use crate::database::manager::DatabaseManager;
use crate::database::todos::TodoRepository;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/tasks/:id - Fetch one of the caller's todos
///
/// A foreign or unknown id is indistinguishable: both yield 404.
pub async fn task_get(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let todo = TodoRepository::new(pool)
        .find_by_id(auth_user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": TodoBody::from(todo),
    })))
}

/// Distinguishes an absent field (keep current value) from an explicit
/// null (clear the value) for nullable columns.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// PUT/PATCH /api/tasks/:id - Update one of the caller's todos
///
/// Partial update: only supplied fields change, and changed enum fields are
/// re-validated. The owner is immutable and not accepted from input.
pub async fn task_update(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let repository = TodoRepository::new(pool);

    let mut todo = repository
        .find_by_id(auth_user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    if let Some(title) = payload.title {
        validate_title(&title)?;
        todo.title = title;
    }
    if let Some(description) = payload.description {
        todo.description = description;
    }
    if let Some(status) = payload.status.as_deref() {
        todo.status = parse_status(status)?;
    }
    if let Some(priority) = payload.priority.as_deref() {
        todo.priority = parse_priority(priority)?;
    }
    if let Some(category) = payload.category {
        validate_category(category.as_deref())?;
        todo.category = category;
    }
    if let Some(due_date) = payload.due_date {
        todo.due_date = due_date;
    }

    let todo = repository
        .save(&todo)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": TodoBody::from(todo),
    })))
}

/// DELETE /api/tasks/:id - Delete one of the caller's todos
///
/// Deleting a missing or foreign row yields 404.
pub async fn task_delete(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let deleted = TodoRepository::new(pool).delete(auth_user.id, id).await?;

    if !deleted {
        return Err(ApiError::not_found("Task not found"));
    }

    Ok(Json(json!({
        "success": true,
        "data": { "deleted": true },
    })))
}
