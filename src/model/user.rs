//! User entity

use crate::validation::Record;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Identifier assigned to a user by whoever supplies it
pub type UserId = u64;

/// A record that can be kept in an `EntityStore`
pub trait Entity: Record + Clone {
    type Id: PartialEq + Clone + std::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// A user managed by the users panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// A blank user for the "new user" form
    pub fn blank(id: UserId) -> Self {
        Self {
            id,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            active: true,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn status_icon(&self) -> &str {
        if self.active {
            "✓"
        } else {
            "✗"
        }
    }
}

impl Record for User {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "email" => Some(Cow::Borrowed(self.email.as_str())),
            "first_name" => Some(Cow::Borrowed(self.first_name.as_str())),
            "last_name" => Some(Cow::Borrowed(self.last_name.as_str())),
            "active" => Some(Cow::Borrowed(if self.active { "true" } else { "false" })),
            _ => None,
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{user_rules, validate};

    #[test]
    fn test_user_fields_by_name() {
        let user = User {
            id: 7,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            active: false,
        };

        assert_eq!(user.field("id").as_deref(), Some("7"));
        assert_eq!(user.field("email").as_deref(), Some("ada@example.com"));
        assert_eq!(user.field("active").as_deref(), Some("false"));
        assert_eq!(user.field("nickname"), None);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_blank_user_fails_validation() {
        let result = validate(&User::blank(1), user_rules());
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 3);
    }

    #[test]
    fn test_deserialize_defaults_active() {
        let user: User =
            serde_json::from_str(r#"{"id": 3, "email": "a@b.com", "first_name": "A", "last_name": "B"}"#)
                .unwrap();
        assert!(user.active);
    }
}
