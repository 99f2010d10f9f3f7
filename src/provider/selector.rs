use std::future::Future;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::ProviderError;
use crate::config::SelectorConfig;
use crate::models::Joke;

/// Picks a random joke by drawing ids in `[1, max_id]` until one exists.
///
/// Ids may have gaps, so a draw can miss; every miss is redrawn up to a
/// ceiling proportional to `max_id`. One generator is seeded once and shared
/// by every call. The lock covers the draw only, never a storage round-trip.
pub struct RandomSelector {
    rng: Mutex<StdRng>,
    attempts_per_id: u64,
    max_attempts: u64,
}

impl RandomSelector {
    pub const DEFAULT_ATTEMPTS_PER_ID: u64 = 3;
    pub const DEFAULT_MAX_ATTEMPTS: u64 = 1000;

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic selector for tests and reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &SelectorConfig) -> Self {
        let selector = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        };
        selector.with_limits(config.attempts_per_id, config.max_attempts)
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            attempts_per_id: Self::DEFAULT_ATTEMPTS_PER_ID,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_limits(mut self, attempts_per_id: u64, max_attempts: u64) -> Self {
        self.attempts_per_id = attempts_per_id.max(1);
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Number of draws allowed before giving up on an id range
    pub fn attempt_ceiling(&self, max_id: i64) -> u64 {
        let span = u64::try_from(max_id).unwrap_or(0);
        span.saturating_mul(self.attempts_per_id)
            .min(self.max_attempts)
            .max(1)
    }

    fn draw(&self, max_id: i64) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(1..=max_id)
    }

    /// Run the selection loop.
    ///
    /// `max_id` is the highest assigned id at the start of the call (`None`
    /// when the store is empty). `fetch` loads a joke by id, returning
    /// `Ok(None)` for a gap; any error it returns stops the loop.
    pub async fn select<F, Fut>(&self, max_id: Option<i64>, mut fetch: F) -> Result<Joke, ProviderError>
    where
        F: FnMut(i64) -> Fut,
        Fut: Future<Output = Result<Option<Joke>, ProviderError>>,
    {
        let max_id = match max_id {
            Some(id) if id >= 1 => id,
            _ => return Err(ProviderError::not_found("no jokes available")),
        };

        let ceiling = self.attempt_ceiling(max_id);
        for attempt in 1..=ceiling {
            let candidate = self.draw(max_id);
            match fetch(candidate).await? {
                Some(joke) => {
                    debug!("random joke {} found on attempt {}", joke.id, attempt);
                    return Ok(joke);
                }
                None => debug!("random joke candidate {} is a gap", candidate),
            }
        }

        warn!(
            "random joke selection gave up after {} attempts (max id {})",
            ceiling, max_id
        );
        Err(ProviderError::unavailable(format!(
            "could not find a joke after {} attempts",
            ceiling
        )))
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::from_entropy()
    }
}
