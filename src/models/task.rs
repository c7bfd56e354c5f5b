use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating a task.
/// Contains validation rules for its fields, checked after trimming.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 3 and 100 characters.
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title must be between 3 and 100 characters."
    ))]
    pub title: String,

    /// Free-form description, stored encrypted.
    /// Must be at least 5 characters.
    #[validate(length(min = 5, message = "Description must be at least 5 characters long."))]
    pub description: String,
}

impl TaskInput {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

/// Represents a task as it sits in storage.
///
/// `description` holds ciphertext. It is only turned back into plaintext for
/// the owner through [`TaskView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The (escaped) title of the task.
    pub title: String,
    /// Encrypted description.
    pub description: String,
}

impl Task {
    /// Creates a new `Task` with a fresh id from an already sanitized title and an
    /// already encrypted description.
    pub fn new(title: String, encrypted_description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: encrypted_description,
        }
    }

    pub fn view(&self, description: String) -> TaskView {
        TaskView {
            id: self.id,
            title: self.title.clone(),
            description,
        }
    }
}

/// The caller-facing form of a task, always with a plaintext description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}
