use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user record from any provider.
///
/// The API key is a credential: it is skipped on serialization and redacted
/// from `Debug` output so it cannot end up in a response body or a log line.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub api_key: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            api_key: api_key.into(),
        }
    }

    /// Public snapshot of this user for embedding in a joke
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Denormalized author attached to jokes on the read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        user.author()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_user_omits_api_key() {
        let user = User::new(1, "The Joker", "abc123");
        let json = serde_json::to_string(&user).unwrap();

        assert_eq!(json, r#"{"id":1,"name":"The Joker"}"#);
        assert!(!json.contains("abc123"));
        assert!(!json.to_lowercase().contains("api"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let user = User::new(1, "The Joker", "abc123");
        let debug = format!("{:?}", user);

        assert!(debug.contains("The Joker"));
        assert!(!debug.contains("abc123"));
    }

    #[test]
    fn author_snapshot_copies_identity() {
        let user = User::new(7, "Pun Master", "secret");
        let author = Author::from(&user);

        assert_eq!(author, Author { id: 7, name: "Pun Master".to_string() });
    }
}
