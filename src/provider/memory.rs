use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{validate_batch, JokeProvider, Page, ProviderError, RandomSelector};
use crate::models::{Joke, NewJoke, User};

#[derive(Debug, Clone)]
struct StoredJoke {
    intro: String,
    punchline: String,
    author_id: Option<i64>,
}

#[derive(Debug)]
struct MemoryState {
    jokes: BTreeMap<i64, StoredJoke>,
    users: BTreeMap<i64, User>,
    next_joke_id: i64,
    next_user_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            jokes: BTreeMap::new(),
            users: BTreeMap::new(),
            next_joke_id: 1,
            next_user_id: 1,
        }
    }
}

impl MemoryState {
    fn hydrate(&self, id: i64, stored: &StoredJoke) -> Joke {
        Joke {
            id,
            intro: stored.intro.clone(),
            punchline: stored.punchline.clone(),
            author_id: stored.author_id,
            author: stored
                .author_id
                .and_then(|author_id| self.users.get(&author_id))
                .map(User::author),
        }
    }
}

/// Process-local provider backed by ordered maps.
///
/// Ids come from monotonically increasing counters and are never reused,
/// so removing a joke leaves a permanent gap just like a SQL sequence.
pub struct InMemoryProvider {
    state: RwLock<MemoryState>,
    selector: RandomSelector,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::with_selector(RandomSelector::from_entropy())
    }

    pub fn with_selector(selector: RandomSelector) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            selector,
        }
    }

    /// Provision a user out of band; keys must be unique
    pub async fn add_user(&self, name: &str, api_key: &str) -> Result<User, ProviderError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.api_key == api_key) {
            return Err(ProviderError::invalid_argument("api key is already assigned to a user"));
        }

        let user = User::new(state.next_user_id, name, api_key);
        state.next_user_id += 1;
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Insert a joke directly, bypassing the write path (legacy or unowned data)
    pub async fn insert_joke(&self, joke: NewJoke, author_id: Option<i64>) -> Joke {
        let mut state = self.state.write().await;
        let id = state.next_joke_id;
        state.next_joke_id += 1;

        let stored = StoredJoke {
            intro: joke.intro,
            punchline: joke.punchline,
            author_id,
        };
        let hydrated = state.hydrate(id, &stored);
        state.jokes.insert(id, stored);
        hydrated
    }

    /// Drop a joke, leaving a gap in the id space
    pub async fn remove_joke(&self, id: i64) -> bool {
        self.state.write().await.jokes.remove(&id).is_some()
    }

    pub async fn joke_count(&self) -> usize {
        self.state.read().await.jokes.len()
    }

    async fn find_joke(&self, id: i64) -> Result<Option<Joke>, ProviderError> {
        let state = self.state.read().await;
        Ok(state.jokes.get(&id).map(|stored| state.hydrate(id, stored)))
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JokeProvider for InMemoryProvider {
    async fn retrieve_random_joke(&self) -> Result<Joke, ProviderError> {
        let max_id = self.state.read().await.jokes.keys().next_back().copied();
        self.selector.select(max_id, |id| self.find_joke(id)).await
    }

    async fn retrieve_jokes(&self, page: Page) -> Result<Vec<Joke>, ProviderError> {
        let state = self.state.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        debug!("memory page {} (offset {}, limit {})", page.number(), offset, limit);
        Ok(state
            .jokes
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, stored)| state.hydrate(*id, stored))
            .collect())
    }

    async fn save_new_jokes(
        &self,
        jokes: Vec<NewJoke>,
        author_id: i64,
    ) -> Result<Vec<Joke>, ProviderError> {
        validate_batch(&jokes)?;

        // Everything below runs under one write lock, so the batch lands whole
        let mut state = self.state.write().await;
        if !state.users.contains_key(&author_id) {
            return Err(ProviderError::invalid_argument(format!(
                "user {} does not exist",
                author_id
            )));
        }

        let mut saved = Vec::with_capacity(jokes.len());
        for joke in jokes {
            let id = state.next_joke_id;
            state.next_joke_id += 1;

            let stored = StoredJoke {
                intro: joke.intro,
                punchline: joke.punchline,
                author_id: Some(author_id),
            };
            saved.push(state.hydrate(id, &stored));
            state.jokes.insert(id, stored);
        }

        debug!("memory saved {} jokes for user {}", saved.len(), author_id);
        Ok(saved)
    }

    async fn get_user_by_api_key(&self, key: &str) -> Result<User, ProviderError> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|user| user.api_key == key)
            .cloned()
            .ok_or_else(|| ProviderError::not_found("no user holds that api key"))
    }
}
