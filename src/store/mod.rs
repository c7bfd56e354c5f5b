//! Storage abstraction.
//!
//! The session authority and the task store only talk to these traits, so the
//! volatile in-memory tables in [`memory`] can be replaced by a durable backend
//! without touching their logic. Every method is `async` and fallible for that
//! reason, even though the in-memory versions never wait and rarely fail.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, User};

pub use memory::{InMemoryRefreshTokens, InMemoryTasks, InMemoryUsers};

/// The user table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Inserts `user`. Must fail with [`AppError::Conflict`] if the username is
    /// taken, checked atomically with the insert.
    async fn insert(&self, user: User) -> Result<(), AppError>;
}

/// At most one live refresh token per user.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Stores `token` as the user's only valid refresh token, replacing any previous one.
    async fn store(&self, user_id: Uuid, token: String) -> Result<(), AppError>;

    /// Returns the user whose current token is exactly `token`.
    async fn find_owner(&self, token: &str) -> Result<Option<Uuid>, AppError>;

    /// Forgets the user's token. Revoking a user with no token is not an error.
    async fn revoke(&self, user_id: Uuid) -> Result<(), AppError>;
}

/// Per-user, insertion-ordered task collections.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates an empty collection for `owner` unless one exists.
    async fn open(&self, owner: Uuid) -> Result<(), AppError>;

    /// The owner's tasks in insertion order; empty if the owner has no collection.
    async fn list(&self, owner: Uuid) -> Result<Vec<Task>, AppError>;

    /// Appends to the owner's collection, creating it if needed.
    async fn append(&self, owner: Uuid, task: Task) -> Result<(), AppError>;

    /// Removes `task_id` from the owner's collection.
    ///
    /// `None` when the owner has no collection, otherwise whether a task was removed.
    async fn remove(&self, owner: Uuid, task_id: Uuid) -> Result<Option<bool>, AppError>;
}
