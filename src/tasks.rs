//! The task store: per-user task collections with encrypted descriptions.
//!
//! Callers pass the user id that [`SessionAuthority::verify_access`] resolved;
//! every read and write is scoped to that user's collection, so there is no
//! way to name another user's task.
//!
//! [`SessionAuthority::verify_access`]: crate::auth::SessionAuthority::verify_access

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::crypto::FieldCipher;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskView};
use crate::security::{escape_html, strip_markup};
use crate::store::{InMemoryTasks, TaskRepository};

pub struct TaskStore {
    tasks: Arc<dyn TaskRepository>,
    cipher: FieldCipher,
}

impl TaskStore {
    pub fn new(cipher: FieldCipher, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks, cipher }
    }

    /// A store over a fresh in-memory table, encrypting with a key derived from `encryption_key`.
    pub fn in_memory(encryption_key: &str) -> Self {
        Self::new(FieldCipher::new(encryption_key), Arc::new(InMemoryTasks::new()))
    }

    /// Makes sure the user has a (possibly empty) collection. Called on every
    /// authenticated task request.
    pub async fn open(&self, user_id: Uuid) -> Result<(), AppError> {
        self.tasks.open(user_id).await
    }

    /// The user's tasks in insertion order, descriptions decrypted.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<TaskView>, AppError> {
        self.tasks
            .list(user_id)
            .await?
            .iter()
            .map(|task| -> Result<TaskView, AppError> {
                Ok(task.view(self.cipher.decrypt(&task.description)?))
            })
            .collect()
    }

    /// Validates, sanitizes and stores a new task, returning it with the
    /// plaintext description. Not idempotent: retrying creates a duplicate.
    pub async fn create(&self, user_id: Uuid, input: TaskInput) -> Result<TaskView, AppError> {
        let input = input.normalized();
        input.validate()?;

        let description = strip_markup(&input.description);
        let task = Task::new(escape_html(&input.title), self.cipher.encrypt(&description)?);
        let view = task.view(description);
        self.tasks.append(user_id, task).await?;

        log::info!("user {} created task {}", user_id, view.id);
        Ok(view)
    }

    /// Deletes one of the user's tasks. Ids that match nothing, including ids
    /// that are not UUIDs at all, are ignored.
    ///
    /// Fails with `AppError::Forbidden` if the user has no collection, which only
    /// happens when [`TaskStore::open`] was never called for them.
    pub async fn delete(&self, user_id: Uuid, task_id: &str) -> Result<(), AppError> {
        // Nil never names a stored task, so it stands in for an unparsable id.
        let task_id = Uuid::parse_str(task_id).unwrap_or(Uuid::nil());

        match self.tasks.remove(user_id, task_id).await? {
            None => Err(AppError::Forbidden("Unauthorized or task not found".into())),
            Some(removed) => {
                if removed {
                    log::info!("user {} deleted task {}", user_id, task_id);
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, description: &str) -> TaskInput {
        TaskInput {
            title: title.into(),
            description: description.into(),
        }
    }

    #[actix_rt::test]
    async fn test_create_then_list_roundtrip() {
        let store = TaskStore::in_memory("test-key");
        let user = Uuid::new_v4();

        let created = store
            .create(user, input("Buy milk", "2% milk"))
            .await
            .unwrap();
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.description, "2% milk");

        assert_eq!(store.list(user).await.unwrap(), vec![created]);
    }

    #[actix_rt::test]
    async fn test_descriptions_are_stored_encrypted() {
        let repo = Arc::new(InMemoryTasks::new());
        let store = TaskStore::new(FieldCipher::new("test-key"), repo.clone());
        let user = Uuid::new_v4();

        store.create(user, input("One", "same words")).await.unwrap();
        store.create(user, input("Two", "same words")).await.unwrap();

        let stored = repo.list(user).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].description, "same words");
        assert_ne!(stored[0].description, stored[1].description);

        let listed = store.list(user).await.unwrap();
        assert!(listed.iter().all(|t| t.description == "same words"));
    }

    #[actix_rt::test]
    async fn test_list_keeps_insertion_order() {
        let store = TaskStore::in_memory("test-key");
        let user = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            store.create(user, input(title, "details")).await.unwrap();
        }

        let titles: Vec<String> = store
            .list(user)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[actix_rt::test]
    async fn test_users_are_isolated() {
        let store = TaskStore::in_memory("test-key");
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let bobs = store.create(bob, input("Bob's", "private stuff")).await.unwrap();
        store.open(alice).await.unwrap();

        assert!(store.list(alice).await.unwrap().is_empty());
        store.delete(alice, &bobs.id.to_string()).await.unwrap();
        assert_eq!(store.list(bob).await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_create_validates_and_sanitizes() {
        let store = TaskStore::in_memory("test-key");
        let user = Uuid::new_v4();

        match store.create(user, input("  ab ", "1234")).await {
            Err(AppError::ValidationError(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["description", "title"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.list(user).await.unwrap().is_empty());

        let created = store
            .create(
                user,
                input(" Tom & Jerry ", "<b>bold</b> move<script>alert(1)</script>"),
            )
            .await
            .unwrap();
        assert_eq!(created.title, "Tom &amp; Jerry");
        assert_eq!(created.description, "bold move");
        assert_eq!(store.list(user).await.unwrap()[0].description, "bold move");
    }

    #[actix_rt::test]
    async fn test_delete() {
        let store = TaskStore::in_memory("test-key");
        let user = Uuid::new_v4();

        let keep = store.create(user, input("Keep", "keep me")).await.unwrap();
        let dropped = store.create(user, input("Drop", "drop me")).await.unwrap();

        // Unknown or unparsable ids leave the collection unchanged.
        store.delete(user, &Uuid::new_v4().to_string()).await.unwrap();
        store.delete(user, "not-a-uuid").await.unwrap();
        assert_eq!(store.list(user).await.unwrap().len(), 2);

        store.delete(user, &dropped.id.to_string()).await.unwrap();
        assert_eq!(store.list(user).await.unwrap(), vec![keep]);
    }

    #[actix_rt::test]
    async fn test_delete_without_collection_is_forbidden() {
        let store = TaskStore::in_memory("test-key");
        let user = Uuid::new_v4();

        assert!(matches!(
            store.delete(user, &Uuid::new_v4().to_string()).await,
            Err(AppError::Forbidden(_))
        ));

        store.open(user).await.unwrap();
        store.delete(user, &Uuid::new_v4().to_string()).await.unwrap();
    }

    #[actix_rt::test]
    async fn test_wrong_key_surfaces_as_internal_error() {
        let repo = Arc::new(InMemoryTasks::new());
        let user = Uuid::new_v4();
        TaskStore::new(FieldCipher::new("old-key"), repo.clone())
            .create(user, input("Title", "secret words"))
            .await
            .unwrap();

        let rotated = TaskStore::new(FieldCipher::new("new-key"), repo);
        assert!(matches!(
            rotated.list(user).await,
            Err(AppError::InternalServerError(_))
        ));
    }
}
