//! API-key bearer authentication for the write path.

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::User;
use crate::provider::{JokeProvider, ProviderError};

/// Literal scheme marker expected at the start of the header value
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a caller could not be authenticated.
///
/// Lookup failures of every kind collapse into `InvalidToken` so callers
/// cannot probe whether a key exists or whether storage is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization token is required")]
    MissingToken,

    #[error("authorization header value must begin with 'Bearer '")]
    MalformedHeader,

    #[error("invalid authentication token")]
    InvalidToken,
}

/// Pull the API key out of a raw `Authorization` header value
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = match header {
        None | Some("") => return Err(AuthError::MissingToken),
        Some(value) => value,
    };

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

/// Resolve the caller behind an `Authorization` header value
pub async fn authenticate(
    provider: &dyn JokeProvider,
    header: Option<&str>,
) -> Result<User, AuthError> {
    let token = extract_bearer(header)?;

    match provider.get_user_by_api_key(token).await {
        Ok(user) => {
            debug!("authenticated user {}", user.id);
            Ok(user)
        }
        Err(ProviderError::NotFound(_)) => {
            warn!("rejected unknown api key");
            Err(AuthError::InvalidToken)
        }
        Err(e) => {
            warn!("api key lookup failed: {}", e);
            Err(AuthError::InvalidToken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Joke, NewJoke};
    use crate::provider::{InMemoryProvider, Page};
    use async_trait::async_trait;

    /// Provider whose storage is always down
    struct BrokenProvider;

    #[async_trait]
    impl JokeProvider for BrokenProvider {
        async fn retrieve_random_joke(&self) -> Result<Joke, ProviderError> {
            Err(ProviderError::unavailable("down"))
        }

        async fn retrieve_jokes(&self, _page: Page) -> Result<Vec<Joke>, ProviderError> {
            Err(ProviderError::unavailable("down"))
        }

        async fn save_new_jokes(&self, _jokes: Vec<NewJoke>, _author_id: i64) -> Result<Vec<Joke>, ProviderError> {
            Err(ProviderError::unavailable("down"))
        }

        async fn get_user_by_api_key(&self, _key: &str) -> Result<User, ProviderError> {
            Err(ProviderError::unavailable("connection refused"))
        }
    }

    #[test]
    fn missing_or_empty_header_requires_token() {
        assert_eq!(extract_bearer(None), Err(AuthError::MissingToken));
        assert_eq!(extract_bearer(Some("")), Err(AuthError::MissingToken));
        assert_eq!(AuthError::MissingToken.to_string(), "authorization token is required");
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer(Some("Basic xyz")).unwrap_err();
        assert_eq!(err, AuthError::MalformedHeader);
        assert!(err.to_string().contains("'Bearer '"));

        assert_eq!(extract_bearer(Some("bearer abc")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_bearer(Some("Bearerabc")), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn extracts_token_after_prefix() {
        assert_eq!(extract_bearer(Some("Bearer abc123")), Ok("abc123"));
        assert_eq!(extract_bearer(Some("Bearer   ")), Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn resolves_known_key() {
        let provider = InMemoryProvider::new();
        let user = provider.add_user("The Joker", "abc123").await.unwrap();

        let resolved = authenticate(&provider, Some("Bearer abc123")).await.unwrap();
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn unknown_key_is_invalid() {
        let provider = InMemoryProvider::new();
        provider.add_user("The Joker", "abc123").await.unwrap();

        let err = authenticate(&provider, Some("Bearer bad-key")).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid authentication token");
    }

    #[tokio::test]
    async fn backend_failure_is_indistinguishable_from_unknown_key() {
        let err = authenticate(&BrokenProvider, Some("Bearer abc123")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }
}
