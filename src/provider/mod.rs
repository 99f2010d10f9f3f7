//! Storage-independent access to jokes and users.
//!
//! Handlers only ever see `Arc<dyn JokeProvider>`; the concrete backend is
//! chosen once at startup.

pub mod memory;
pub mod page;
pub mod postgres;
pub mod selector;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Joke, NewJoke, User};

pub use memory::InMemoryProvider;
pub use page::Page;
pub use postgres::PgProvider;
pub use selector::RandomSelector;

/// Errors surfaced by any provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ProviderError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ProviderError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ProviderError::NotFound(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ProviderError::Unavailable(message.into())
    }
}

/// Operations the service needs from a backing store.
///
/// `save_new_jokes` is the only mutating call and must persist the whole
/// batch or nothing.
#[async_trait]
pub trait JokeProvider: Send + Sync {
    /// One joke picked uniformly over the ids that currently exist
    async fn retrieve_random_joke(&self) -> Result<Joke, ProviderError>;

    /// Jokes in ascending id order within the given window
    async fn retrieve_jokes(&self, page: Page) -> Result<Vec<Joke>, ProviderError>;

    /// Persist new jokes owned by `author_id`, returning them with ids and author attached
    async fn save_new_jokes(
        &self,
        jokes: Vec<NewJoke>,
        author_id: i64,
    ) -> Result<Vec<Joke>, ProviderError>;

    async fn get_user_by_api_key(&self, key: &str) -> Result<User, ProviderError>;

    /// Liveness of the backing store
    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Reject a batch before anything is written
pub(crate) fn validate_batch(jokes: &[NewJoke]) -> Result<(), ProviderError> {
    for (index, joke) in jokes.iter().enumerate() {
        if let Some(field) = joke.blank_field() {
            return Err(ProviderError::invalid_argument(format!(
                "joke at index {} has an empty {}",
                index, field
            )));
        }
    }
    Ok(())
}
