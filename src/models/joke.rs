use serde::{Deserialize, Serialize};

use super::user::Author;

/// A joke record from any provider.
///
/// `author_id` is the raw foreign key and never leaves the process; the
/// author is exposed as `user` only when a provider attached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: i64,
    pub intro: String,
    pub punchline: String,
    #[serde(skip)]
    pub author_id: Option<i64>,
    #[serde(rename = "user", skip_serializing_if = "Option::is_none", default)]
    pub author: Option<Author>,
}

impl Joke {
    pub fn with_author(mut self, author: Author) -> Self {
        self.author_id = Some(author.id);
        self.author = Some(author);
        self
    }
}

/// Incoming joke body on the write path.
///
/// Clients may echo back full joke objects; `id` and `user` are ignored
/// because storage assigns both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJoke {
    pub intro: String,
    pub punchline: String,
}

impl NewJoke {
    pub fn new(intro: impl Into<String>, punchline: impl Into<String>) -> Self {
        Self {
            intro: intro.into(),
            punchline: punchline.into(),
        }
    }

    /// Name of the first empty field, if any
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.intro.trim().is_empty() {
            Some("intro")
        } else if self.punchline.trim().is_empty() {
            Some("punchline")
        } else {
            None
        }
    }
}
