use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use crate::config::Config;
use crate::controller::AppState;
use crate::repositories::postgres_repo::{build_pool, PostgresConnectionRepo};

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    if let Err(e) = run(config).await {
        error!("Restaurant discovery backend stopped: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("Starting restaurant discovery backend in {} environment", config.environment);

    let postgres_connection = build_pool(
        &config.database_url,
        config.pool_max_size(),
        Duration::from_secs(config.db_connect_timeout_secs),
    ).await?;

    let postgres_repo = Arc::new(PostgresConnectionRepo::new(postgres_connection));
    let app_state = AppState {
        restaurant_repo: postgres_repo.clone(),
        user_repo: postgres_repo,
    };

    controller::serve(app_state, &config).await
}
