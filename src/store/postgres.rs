use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{task_not_found, username_taken, TaskStore, UserStore};
use crate::auth::identity::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate, User};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS tasks_owner_id_idx ON tasks (owner_id, id)",
];

const TASK_COLUMNS: &str = "id, title, description, completed, owner_id";

/// PostgreSQL-backed store. Each mutation runs in its own transaction.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates the `users` and `tasks` tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// SQLSTATE 23505: unique_violation
fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db_error| db_error.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                username_taken()
            } else {
                AppError::from(e)
            }
        })?;
        tx.commit().await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list(
        &self,
        owner: &AuthenticatedUser,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner.id())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn create(&self, owner: &AuthenticatedUser, input: &TaskInput) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, completed, owner_id)
             VALUES ($1, $2, FALSE, $3)
             RETURNING {}",
            TASK_COLUMNS
        );
        let mut tx = self.pool.begin().await?;
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(owner.id())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(task)
    }

    async fn get(&self, owner: &AuthenticatedUser, task_id: i64) -> Result<Task, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner.id())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(task_not_found)
    }

    async fn update(
        &self,
        owner: &AuthenticatedUser,
        task_id: i64,
        update: &TaskUpdate,
    ) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, description = $2, completed = $3
             WHERE id = $4 AND owner_id = $5
             RETURNING {}",
            TASK_COLUMNS
        );
        let mut tx = self.pool.begin().await?;
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&update.title)
            .bind(&update.description)
            .bind(update.completed)
            .bind(task_id)
            .bind(owner.id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(task_not_found)?;
        tx.commit().await?;
        Ok(task)
    }

    async fn delete(&self, owner: &AuthenticatedUser, task_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(task_id)
            .bind(owner.id())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }
        tx.commit().await?;
        Ok(())
    }
}
