use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Todo, TodoPriority, TodoStatus};

const COLUMNS: &str =
    "id, user_id, title, description, status, priority, category, due_date, created_at, updated_at";

/// Default ordering: due date descending with undated rows last, then
/// priority high to low, then newest first.
const DEFAULT_ORDER: &str = "ORDER BY due_date DESC NULLS LAST, \
     CASE priority WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END DESC, \
     created_at DESC";

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Exact-match list filters; None means no constraint
#[derive(Debug, Default, Clone)]
pub struct TodoFilter {
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub category: Option<String>,
}

/// Per-status counts for the summary and statistics projections
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct StatusCounts {
    pub open: i64,
    pub in_progress: i64,
    pub done: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.open + self.in_progress + self.done + self.cancelled
    }
}

/// All queries are scoped to the owning user before any other predicate;
/// a foreign id behaves exactly like a missing one.
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user_id: Uuid, new_todo: &NewTodo) -> Result<Todo, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (user_id, title, description, status, priority, category, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&new_todo.title)
        .bind(new_todo.description.as_deref())
        .bind(new_todo.status.as_str())
        .bind(new_todo.priority.as_str())
        .bind(new_todo.category.as_deref())
        .bind(new_todo.due_date)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {COLUMNS} FROM todos WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(&self, user_id: Uuid, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {COLUMNS} FROM todos
             WHERE user_id = $1
               AND ($2::text IS NULL OR status = $2)
               AND ($3::text IS NULL OR priority = $3)
               AND ($4::text IS NULL OR category = $4)
             {DEFAULT_ORDER}"
        ))
        .bind(user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.priority.map(|p| p.as_str()))
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await
    }

    /// Persist the mutable columns of an already-loaded todo. The owner
    /// column never changes; it participates only in the WHERE clause.
    pub async fn save(&self, todo: &Todo) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET title = $3, description = $4, status = $5, priority = $6,
                 category = $7, due_date = $8, updated_at = now()
             WHERE user_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(todo.user_id)
        .bind(todo.id)
        .bind(&todo.title)
        .bind(todo.description.as_deref())
        .bind(todo.status.as_str())
        .bind(todo.priority.as_str())
        .bind(todo.category.as_deref())
        .bind(todo.due_date)
        .fetch_optional(&self.pool)
        .await
    }

    /// Returns false when nothing was deleted (missing or foreign row)
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn status_counts(&self, user_id: Uuid) -> Result<StatusCounts, sqlx::Error> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM todos WHERE user_id = $1 GROUP BY status")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status.as_str() {
                "open" => counts.open = count,
                "in_progress" => counts.in_progress = count,
                "done" => counts.done = count,
                "cancelled" => counts.cancelled = count,
                other => tracing::warn!("Unexpected status value in todos table: {}", other),
            }
        }
        Ok(counts)
    }

    pub async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {COLUMNS} FROM todos WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
