use axum::{http::StatusCode, response::Json, Extension};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_priority, parse_status, validate_category, validate_title, TodoBody};
use crate::database::manager::DatabaseManager;
use crate::database::models::{TodoPriority, TodoStatus};
use crate::database::todos::{NewTodo, TodoRepository};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// POST /api/tasks - Create a todo owned by the caller
///
/// The owner comes from the authenticated identity and is never accepted
/// from the request body.
pub async fn task_create(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_title(&payload.title)?;
    validate_category(payload.category.as_deref())?;

    let status = match payload.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => TodoStatus::Open,
    };
    let priority = match payload.priority.as_deref() {
        Some(value) => parse_priority(value)?,
        None => TodoPriority::Medium,
    };

    let new_todo = NewTodo {
        title: payload.title,
        description: payload.description,
        status,
        priority,
        category: payload.category,
        due_date: payload.due_date,
    };

    let pool = DatabaseManager::pool().await?;
    let todo = TodoRepository::new(pool).insert(auth_user.id, &new_todo).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": TodoBody::from(todo),
        })),
    ))
}
