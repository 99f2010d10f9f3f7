use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, info};

use super::{validate_batch, JokeProvider, Page, ProviderError, RandomSelector};
use crate::database::DatabaseManager;
use crate::models::{Author, Joke, NewJoke, User};

/// Joke joined with its (optional) author
const JOKE_SELECT: &str = r#"
    SELECT j.id, j.intro, j.punchline, j.user_id, u.name AS user_name
    FROM jokes j
    LEFT JOIN users u ON u.id = j.user_id
"#;

#[derive(Debug, FromRow)]
struct JokeRow {
    id: i64,
    intro: String,
    punchline: String,
    user_id: Option<i64>,
    user_name: Option<String>,
}

impl From<JokeRow> for Joke {
    fn from(row: JokeRow) -> Self {
        let author = match (row.user_id, row.user_name) {
            (Some(id), Some(name)) => Some(Author { id, name }),
            _ => None,
        };
        Joke {
            id: row.id,
            intro: row.intro,
            punchline: row.punchline,
            author_id: row.user_id,
            author,
        }
    }
}

/// Provider backed by the `jokes` and `users` tables in Postgres
pub struct PgProvider {
    pool: PgPool,
    selector: RandomSelector,
    log_queries: bool,
}

impl PgProvider {
    pub fn new(pool: PgPool, selector: RandomSelector) -> Self {
        Self {
            pool,
            selector,
            log_queries: false,
        }
    }

    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Provision a user out of band (CLI, fixtures)
    pub async fn create_user(&self, name: &str, api_key: &str) -> Result<User, ProviderError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, api_key) VALUES ($1, $2) RETURNING id, name, api_key",
        )
        .bind(name)
        .bind(api_key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ProviderError::invalid_argument("api key is already assigned to a user")
            }
            other => ProviderError::Database(other),
        })?;

        info!("Provisioned user {} ({})", user.id, user.name);
        Ok(user)
    }

    async fn max_joke_id(&self) -> Result<Option<i64>, ProviderError> {
        let max_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM jokes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("couldn't determine the highest joke id: {}", e);
                ProviderError::unavailable("couldn't determine number of jokes in the store")
            })?;
        Ok(max_id)
    }

    async fn find_joke(&self, id: i64) -> Result<Option<Joke>, ProviderError> {
        if self.log_queries {
            debug!("fetching joke {}", id);
        }
        let row = sqlx::query_as::<_, JokeRow>(&format!("{} WHERE j.id = $1", JOKE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("could not fetch joke {}: {}", id, e);
                ProviderError::unavailable("could not fetch a random joke from the store")
            })?;
        Ok(row.map(Joke::from))
    }
}

#[async_trait]
impl JokeProvider for PgProvider {
    async fn retrieve_random_joke(&self) -> Result<Joke, ProviderError> {
        let max_id = self.max_joke_id().await?;
        self.selector.select(max_id, |id| self.find_joke(id)).await
    }

    async fn retrieve_jokes(&self, page: Page) -> Result<Vec<Joke>, ProviderError> {
        if self.log_queries {
            debug!("fetching joke page {} (offset {}, limit {})", page.number(), page.offset(), page.limit());
        }
        let rows = sqlx::query_as::<_, JokeRow>(&format!(
            "{} ORDER BY j.id ASC LIMIT $1 OFFSET $2",
            JOKE_SELECT
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Joke::from).collect())
    }

    async fn save_new_jokes(
        &self,
        jokes: Vec<NewJoke>,
        author_id: i64,
    ) -> Result<Vec<Joke>, ProviderError> {
        validate_batch(&jokes)?;

        let mut tx = self.pool.begin().await?;

        let author = sqlx::query_as::<_, User>("SELECT id, name, api_key FROM users WHERE id = $1")
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ProviderError::invalid_argument(format!("user {} does not exist", author_id)))?
            .author();

        let mut saved = Vec::with_capacity(jokes.len());
        for joke in jokes {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO jokes (intro, punchline, user_id) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&joke.intro)
            .bind(&joke.punchline)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

            saved.push(
                Joke {
                    id,
                    intro: joke.intro,
                    punchline: joke.punchline,
                    author_id: None,
                    author: None,
                }
                .with_author(author.clone()),
            );
        }

        // Dropping the transaction on any earlier `?` rolls the whole batch back
        tx.commit().await?;

        debug!("saved {} jokes for user {}", saved.len(), author_id);
        Ok(saved)
    }

    async fn get_user_by_api_key(&self, key: &str) -> Result<User, ProviderError> {
        sqlx::query_as::<_, User>("SELECT id, name, api_key FROM users WHERE api_key = $1 LIMIT 1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ProviderError::not_found("no user holds that api key"))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        DatabaseManager::health_check(&self.pool).await.map_err(|e| {
            error!("storage health check failed: {}", e);
            ProviderError::unavailable("database unavailable")
        })
    }
}
