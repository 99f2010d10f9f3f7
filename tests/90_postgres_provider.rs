//! Runs against a live database; set DATABASE_URL and pass `--ignored`.

use anyhow::{Context, Result};
use dadz_api::config::AppConfig;
use dadz_api::database::{schema, DatabaseManager};
use dadz_api::models::NewJoke;
use dadz_api::provider::{JokeProvider, Page, PgProvider, ProviderError, RandomSelector};
use uuid::Uuid;

async fn provider() -> Result<PgProvider> {
    let mut config = AppConfig::development();
    config.database.url = Some(std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?);

    let pool = DatabaseManager::connect(&config.database).await?;
    schema::migrate(&pool).await?;
    Ok(PgProvider::new(pool, RandomSelector::seeded(7)))
}

#[tokio::test]
#[ignore]
async fn saves_and_reads_back_jokes() -> Result<()> {
    let provider = provider().await?;
    let key = Uuid::new_v4().simple().to_string();
    let user = provider.create_user("Integration Dad", &key).await?;

    let saved = provider
        .save_new_jokes(vec![NewJoke::new("I used to hate facial hair", "but then it grew on me")], user.id)
        .await?;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].author.as_ref().map(|a| a.id), Some(user.id));

    let found = provider.get_user_by_api_key(&key).await?;
    assert_eq!(found.id, user.id);

    let random = provider.retrieve_random_joke().await?;
    assert!(random.id > 0);

    let first = provider.retrieve_jokes(Page::new(1, 1000)?).await?;
    assert!(first.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert!(first.iter().any(|joke| joke.id == saved[0].id) || first.len() == 1000);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn duplicate_api_key_is_rejected() -> Result<()> {
    let provider = provider().await?;
    let key = Uuid::new_v4().simple().to_string();
    provider.create_user("First", &key).await?;

    let result = provider.create_user("Second", &key).await;
    assert!(matches!(result, Err(ProviderError::InvalidArgument(_))));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn unknown_author_rolls_back_batch() -> Result<()> {
    let provider = provider().await?;

    let result = provider
        .save_new_jokes(vec![NewJoke::new("intro", "punchline")], i64::MAX)
        .await;
    assert!(matches!(result, Err(ProviderError::InvalidArgument(_))));

    let missing = provider.get_user_by_api_key("definitely-not-a-key").await;
    assert!(matches!(missing, Err(ProviderError::NotFound(_))));
    Ok(())
}
