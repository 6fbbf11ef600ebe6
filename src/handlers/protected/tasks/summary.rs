use axum::{response::Json, Extension};
use serde_json::{json, Value};

use super::TodoBody;
use crate::database::manager::DatabaseManager;
use crate::database::todos::TodoRepository;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Most-recent items included in the summary view
const RECENT_TASKS_LIMIT: i64 = 5;

/// GET /api/tasks/summary - Per-status counts plus recent items
pub async fn task_summary(
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let repository = TodoRepository::new(pool);

    let counts = repository.status_counts(auth_user.id).await?;
    let recent = repository.recent(auth_user.id, RECENT_TASKS_LIMIT).await?;
    let recent_bodies: Vec<TodoBody> = recent.into_iter().map(TodoBody::from).collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "summary": counts,
            "recent_tasks": recent_bodies,
        }
    })))
}

/// GET /api/tasks/statistics - Aggregate counts for the caller
pub async fn task_statistics(
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let counts = TodoRepository::new(pool).status_counts(auth_user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "total_tasks": counts.total(),
            "open_tasks": counts.open,
            "in_progress_tasks": counts.in_progress,
            "done_tasks": counts.done,
            "cancelled_tasks": counts.cancelled,
        }
    })))
}
