use anyhow::Context;
use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::provider::{PgProvider, RandomSelector};

#[derive(Debug, Args)]
pub struct AddUserArgs {
    #[arg(help = "Display name")]
    pub name: String,

    #[arg(long, help = "API key to assign (random when omitted)")]
    pub api_key: Option<String>,
}

/// 32 lowercase hex characters
pub fn generate_api_key() -> String {
    Uuid::new_v4().simple().to_string()
}

pub async fn handle(args: AddUserArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let api_key = args.api_key.unwrap_or_else(generate_api_key);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let provider = PgProvider::new(pool, RandomSelector::default());

    let user = provider
        .create_user(&args.name, &api_key)
        .await
        .with_context(|| format!("failed to create user '{}'", args.name))?;
    provider.pool().close().await;

    // The key is shown once here; it is never serialized anywhere else
    output_success(
        output_format,
        &format!("Created user '{}'", user.name),
        Some(json!({ "id": user.id, "name": user.name, "api_key": user.api_key })),
    )
}
