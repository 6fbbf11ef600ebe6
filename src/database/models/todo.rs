use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Raised when a stored or submitted value falls outside a closed vocabulary
#[derive(Debug, thiserror::Error)]
#[error("unrecognized value: {0}")]
pub struct InvalidEnumValue(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Open,
    InProgress,
    Done,
    Cancelled,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 4] = [
        TodoStatus::Open,
        TodoStatus::InProgress,
        TodoStatus::Done,
        TodoStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Open => "open",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Done => "done",
            TodoStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states are excluded from overdue computation
    pub fn is_terminal(&self) -> bool {
        matches!(self, TodoStatus::Done | TodoStatus::Cancelled)
    }
}

impl FromStr for TodoStatus {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(TodoStatus::Open),
            "in_progress" => Ok(TodoStatus::InProgress),
            "done" => Ok(TodoStatus::Done),
            "cancelled" => Ok(TodoStatus::Cancelled),
            other => Err(InvalidEnumValue(other.to_string())),
        }
    }
}

impl TryFrom<String> for TodoStatus {
    type Error = InvalidEnumValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    Medium,
    High,
}

impl TodoPriority {
    pub const ALL: [TodoPriority; 3] =
        [TodoPriority::Low, TodoPriority::Medium, TodoPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
        }
    }
}

impl FromStr for TodoPriority {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(TodoPriority::Low),
            "medium" => Ok(TodoPriority::Medium),
            "high" => Ok(TodoPriority::High),
            other => Err(InvalidEnumValue(other.to_string())),
        }
    }
}

impl TryFrom<String> for TodoPriority {
    type Error = InvalidEnumValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-owned task. `user_id` is set at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TodoStatus,
    #[sqlx(try_from = "String")]
    pub priority: TodoPriority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// A todo is overdue iff it has a due date strictly before `today`
    /// and has not reached a terminal status.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.status.is_terminal(),
            None => false,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(status: TodoStatus, due_date: Option<NaiveDate>) -> Todo {
        let now = Utc::now();
        Todo {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "write report".to_string(),
            description: None,
            status,
            priority: TodoPriority::Medium,
            category: None,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let today = date(2026, 3, 10);

        let past_open = todo(TodoStatus::Open, Some(date(2026, 3, 9)));
        assert!(past_open.is_overdue_on(today));

        let past_in_progress = todo(TodoStatus::InProgress, Some(date(2026, 3, 9)));
        assert!(past_in_progress.is_overdue_on(today));

        let past_done = todo(TodoStatus::Done, Some(date(2026, 3, 9)));
        assert!(!past_done.is_overdue_on(today));

        let past_cancelled = todo(TodoStatus::Cancelled, Some(date(2026, 3, 9)));
        assert!(!past_cancelled.is_overdue_on(today));
    }

    #[test]
    fn due_today_is_not_overdue() {
        let today = date(2026, 3, 10);
        let due_today = todo(TodoStatus::Open, Some(today));
        assert!(!due_today.is_overdue_on(today));
    }

    #[test]
    fn missing_due_date_is_never_overdue() {
        let today = date(2026, 3, 10);
        assert!(!todo(TodoStatus::Open, None).is_overdue_on(today));
    }

    #[test]
    fn status_parses_closed_vocabulary() {
        assert_eq!("in_progress".parse::<TodoStatus>().unwrap(), TodoStatus::InProgress);
        assert_eq!(TodoStatus::InProgress.as_str(), "in_progress");
        assert!("In Progress".parse::<TodoStatus>().is_err());
        assert!("".parse::<TodoStatus>().is_err());
    }

    #[test]
    fn priority_parses_closed_vocabulary() {
        assert_eq!("high".parse::<TodoPriority>().unwrap(), TodoPriority::High);
        assert!("urgent".parse::<TodoPriority>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TodoStatus::Done.is_terminal());
        assert!(TodoStatus::Cancelled.is_terminal());
        assert!(!TodoStatus::Open.is_terminal());
        assert!(!TodoStatus::InProgress.is_terminal());
    }
}
