use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use tracing::{error, info};

use crate::app::app;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::provider::{InMemoryProvider, JokeProvider, PgProvider, RandomSelector};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    Postgres,
    Memory,
}

/// `NAME=KEY` pair for provisioning users into memory storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub name: String,
    pub api_key: String,
}

impl FromStr for SeedUser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, key)) if !name.trim().is_empty() && !key.trim().is_empty() => Ok(SeedUser {
                name: name.trim().to_string(),
                api_key: key.trim().to_string(),
            }),
            _ => Err(format!("expected NAME=KEY, got '{}'", s)),
        }
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, value_enum, default_value_t = StorageKind::Postgres, help = "Storage backend")]
    pub storage: StorageKind,

    #[arg(long, help = "Port to listen on (overrides DADZ_PORT)")]
    pub port: Option<u16>,

    #[arg(
        long = "seed-user",
        value_name = "NAME=KEY",
        help = "User to provision at startup (memory storage only, repeatable)"
    )]
    pub seed_users: Vec<SeedUser>,
}

pub async fn handle(args: ServeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let provider = build_provider(&args, config).await?;
    let state = AppState::new(provider, config.clone());

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("dadz-api listening on http://{} ({:?} storage)", bind_addr, args.storage);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("dadz-api stopped");
    Ok(())
}

async fn build_provider(args: &ServeArgs, config: &AppConfig) -> anyhow::Result<Arc<dyn JokeProvider>> {
    let selector = RandomSelector::from_config(&config.selector);

    match args.storage {
        StorageKind::Postgres => {
            if !args.seed_users.is_empty() {
                bail!("--seed-user is only supported with --storage memory");
            }
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            let provider = PgProvider::new(pool, selector)
                .with_query_logging(config.database.enable_query_logging);
            Ok(Arc::new(provider))
        }
        StorageKind::Memory => {
            let provider = InMemoryProvider::with_selector(selector);
            for seed in &args.seed_users {
                provider
                    .add_user(&seed.name, &seed.api_key)
                    .await
                    .with_context(|| format!("failed to seed user '{}'", seed.name))?;
                info!("Seeded user '{}' into memory storage", seed.name);
            }
            Ok(Arc::new(provider))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
