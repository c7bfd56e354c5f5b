//! Volatile, process-local tables. Everything is lost on restart.
//!
//! Each table sits behind its own `RwLock`; no lock is held across an `.await`.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::{RefreshTokenRepository, TaskRepository, UserRepository};
use crate::error::AppError;
use crate::models::{Task, User};

#[derive(Default)]
pub struct InMemoryUsers {
    by_username: RwLock<HashMap<String, User>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.by_username.read().get(username).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), AppError> {
        let mut users = self.by_username.write();
        if users.contains_key(&user.username) {
            return Err(AppError::Conflict("Username already exists.".into()));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokens {
    by_user: RwLock<HashMap<Uuid, String>>,
}

impl InMemoryRefreshTokens {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokens {
    async fn store(&self, user_id: Uuid, token: String) -> Result<(), AppError> {
        self.by_user.write().insert(user_id, token);
        Ok(())
    }

    async fn find_owner(&self, token: &str) -> Result<Option<Uuid>, AppError> {
        Ok(self
            .by_user
            .read()
            .iter()
            .find(|(_, stored)| stored.as_str() == token)
            .map(|(user_id, _)| *user_id))
    }

    async fn revoke(&self, user_id: Uuid) -> Result<(), AppError> {
        self.by_user.write().remove(&user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTasks {
    by_owner: RwLock<HashMap<Uuid, Vec<Task>>>,
}

impl InMemoryTasks {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTasks {
    async fn open(&self, owner: Uuid) -> Result<(), AppError> {
        self.by_owner.write().entry(owner).or_default();
        Ok(())
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<Task>, AppError> {
        Ok(self
            .by_owner
            .read()
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, owner: Uuid, task: Task) -> Result<(), AppError> {
        self.by_owner.write().entry(owner).or_default().push(task);
        Ok(())
    }

    async fn remove(&self, owner: Uuid, task_id: Uuid) -> Result<Option<bool>, AppError> {
        let mut collections = self.by_owner.write();
        Ok(collections.get_mut(&owner).map(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id != task_id);
            tasks.len() != before
        }))
    }
}
