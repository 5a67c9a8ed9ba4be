use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{task_not_found, username_taken, TaskStore, UserStore};
use crate::auth::identity::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate, User};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// In-process store with the same semantics as [`super::PgStore`].
///
/// Used by the test suites and for running the service without a database
/// (`DATABASE_URL=memory`). Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == username) {
            return Err(username_taken());
        }

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(
        &self,
        owner: &AuthenticatedUser,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.owner_id == owner.id())
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, owner: &AuthenticatedUser, input: &TaskInput) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        state.last_task_id += 1;
        let task = Task {
            id: state.last_task_id,
            title: input.title.clone(),
            description: input.description.clone(),
            completed: false,
            owner_id: owner.id(),
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, owner: &AuthenticatedUser, task_id: i64) -> Result<Task, AppError> {
        let state = self.state.read().await;
        state
            .tasks
            .get(&task_id)
            .filter(|t| t.owner_id == owner.id())
            .cloned()
            .ok_or_else(task_not_found)
    }

    async fn update(
        &self,
        owner: &AuthenticatedUser,
        task_id: i64,
        update: &TaskUpdate,
    ) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.owner_id == owner.id())
            .ok_or_else(task_not_found)?;

        task.title = update.title.clone();
        task.description = update.description.clone();
        task.completed = update.completed;
        Ok(task.clone())
    }

    async fn delete(&self, owner: &AuthenticatedUser, task_id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        match state.tasks.get(&task_id) {
            Some(task) if task.owner_id == owner.id() => {
                state.tasks.remove(&task_id);
                Ok(())
            }
            _ => Err(task_not_found()),
        }
    }
}
