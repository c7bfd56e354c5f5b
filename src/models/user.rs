use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered account as kept by the user repository.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// bcrypt hash, never the plaintext.
    pub password_hash: String,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
        }
    }
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long."))]
    pub username: String,
    /// Plaintext; only its hash reaches [`User`].
    #[validate(length(min = 5, message = "Password must be at least 5 characters long."))]
    pub password: String,
}

impl UserInput {
    /// Trims surrounding whitespace from the username; the password is taken verbatim.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_user_input_validation() {
        // Test valid input
        let input = UserInput {
            username: "alice".to_string(),
            password: "password1".to_string(),
        };
        assert!(input.validate().is_ok());

        // Test short username
        let input = UserInput {
            username: "al".to_string(),
            password: "password1".to_string(),
        };
        assert!(input.validate().is_err());

        // Test short password
        let input = UserInput {
            username: "alice".to_string(),
            password: "pass".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_normalized_trims_username_only() {
        let input = UserInput {
            username: "  al  ".to_string(),
            password: " pass ".to_string(),
        }
        .normalized();
        assert_eq!(input.username, "al");
        assert_eq!(input.password, " pass ");
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("alice".into(), "hash".into());
        let b = User::new("alice".into(), "hash".into());
        assert_ne!(a.id, b.id);
    }
}
