use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod state;
mod storage;

use crate::config::{AppConfig, Env};

fn setup_logging(env: Env) {
    let default_level = match env {
        Env::Local | Env::Dev => "sso=debug,tower_http=debug",
        Env::Prod => "sso=info,tower_http=info",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match env {
        Env::Local => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
        Env::Dev | Env::Prod => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    setup_logging(config.env);

    tracing::info!(
        env = ?config.env,
        token_ttl = ?config.token_ttl,
        request_timeout = ?config.request_timeout,
        "starting application"
    );

    let (state, db) = state::AppState::init(config.clone()).await?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    let app = app::build_app(state);
    app::serve(app, &config.host, config.port).await?;

    db.close().await;
    tracing::info!("application stopped");
    Ok(())
}
