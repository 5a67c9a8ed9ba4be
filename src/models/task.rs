use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Number of tasks returned by a list call when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 100;
/// Upper bound accepted for `limit`.
pub const MAX_LIMIT: i64 = 1000;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Identifier assigned by the store.
    pub id: i64,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Identifier of the user who owns the task.
    pub owner_id: i64,
}

/// Input structure for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Replacement values for a task's mutable fields.
///
/// Updates are wholesale: an omitted `description` clears it and an omitted
/// `completed` resets it to `false`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

/// Pagination parameters for listing tasks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_input_validation() {
        let valid = TaskInput {
            title: "Buy milk".to_string(),
            description: Some("2 litres".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_title = TaskInput {
            title: "".to_string(),
            description: None,
        };
        assert!(empty_title.validate().is_err());

        let long_description = TaskInput {
            title: "Valid".to_string(),
            description: Some("b".repeat(1001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_task_update_defaults() {
        let update: TaskUpdate = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        assert_eq!(update.title, "t");
        assert_eq!(update.description, None);
        assert!(!update.completed);

        let too_long = TaskUpdate {
            title: "a".repeat(201),
            description: None,
            completed: true,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults_and_bounds() {
        let query = ListQuery::default();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert!(query.validate().is_ok());

        let negative = ListQuery {
            offset: Some(-1),
            limit: None,
        };
        assert!(negative.validate().is_err());

        let zero_limit = ListQuery {
            offset: None,
            limit: Some(0),
        };
        assert!(zero_limit.validate().is_err());

        let huge_limit = ListQuery {
            offset: None,
            limit: Some(MAX_LIMIT + 1),
        };
        assert!(huge_limit.validate().is_err());
    }
}
