use axum::{extract::Query, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_priority, parse_status, TodoBody};
use crate::database::manager::DatabaseManager;
use crate::database::todos::{TodoFilter, TodoRepository};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
pub struct ListTodosQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

/// GET /api/tasks - List the caller's todos
///
/// Optional exact-match filters on status, priority and category. Results
/// are ordered by due date descending (undated last), then priority, then
/// newest first.
pub async fn task_list(
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = TodoFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        priority: query.priority.as_deref().map(parse_priority).transpose()?,
        category: query.category,
    };

    let pool = DatabaseManager::pool().await?;
    let todos = TodoRepository::new(pool).list(auth_user.id, &filter).await?;

    let bodies: Vec<TodoBody> = todos.into_iter().map(TodoBody::from).collect();

    Ok(Json(json!({
        "success": true,
        "data": bodies,
    })))
}
