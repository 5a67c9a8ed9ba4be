//! Persistence for users and tasks.
//!
//! Two backends implement the same traits: [`PgStore`] on top of a sqlx
//! PostgreSQL pool, and [`MemoryStore`] which keeps everything in process.
//!
//! Every task operation takes an [`AuthenticatedUser`], which only the identity
//! resolver can produce, and filters on `(task id, owner id)` jointly. A task id
//! on its own never grants access.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::auth::identity::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a new user. Fails with `AppError::Conflict` if the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    /// Exact, case-sensitive lookup by username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

/// Task storage scoped to the owning user.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `owner`, ordered by id.
    async fn list(
        &self,
        owner: &AuthenticatedUser,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AppError>;

    /// Creates a task for `owner` with `completed = false`.
    async fn create(&self, owner: &AuthenticatedUser, input: &TaskInput) -> Result<Task, AppError>;

    async fn get(&self, owner: &AuthenticatedUser, task_id: i64) -> Result<Task, AppError>;

    /// Replaces title, description and completion of an owned task.
    async fn update(
        &self,
        owner: &AuthenticatedUser,
        task_id: i64,
        update: &TaskUpdate,
    ) -> Result<Task, AppError>;

    async fn delete(&self, owner: &AuthenticatedUser, task_id: i64) -> Result<(), AppError>;
}

pub(crate) fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

pub(crate) fn username_taken() -> AppError {
    AppError::Conflict("Username already registered".into())
}
