use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Todo, TodoPriority, TodoStatus};
use crate::error::ApiError;

pub mod create;
pub mod detail;
pub mod list;
pub mod summary;

pub use create::task_create;
pub use detail::{task_delete, task_get, task_update};
pub use list::task_list;
pub use summary::{task_statistics, task_summary};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const CATEGORY_MAX_LENGTH: usize = 30;

/// Wire representation of a todo, carrying the derived `overdue` flag.
/// The owner is always the caller, so no user object is embedded.
#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoBody {
    fn from(todo: Todo) -> Self {
        let overdue = todo.is_overdue();
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            priority: todo.priority,
            category: todo.category,
            due_date: todo.due_date,
            overdue,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

pub(crate) fn field_error(field: &str, message: &str) -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert(field.to_string(), message.to_string());
    ApiError::validation_error("Validation failed", Some(field_errors))
}

pub(crate) fn parse_status(value: &str) -> Result<TodoStatus, ApiError> {
    value
        .parse()
        .map_err(|_| field_error("status", "Invalid status value"))
}

pub(crate) fn parse_priority(value: &str) -> Result<TodoPriority, ApiError> {
    value
        .parse()
        .map_err(|_| field_error("priority", "Invalid priority value"))
}

pub(crate) fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(field_error("title", "Title cannot be empty"));
    }
    if title.len() > TITLE_MAX_LENGTH {
        return Err(field_error(
            "title",
            "Title must be at most 200 characters",
        ));
    }
    Ok(())
}

pub(crate) fn validate_category(category: Option<&str>) -> Result<(), ApiError> {
    if let Some(category) = category {
        if category.len() > CATEGORY_MAX_LENGTH {
            return Err(field_error(
                "category",
                "Category must be at most 30 characters",
            ));
        }
    }
    Ok(())
}
