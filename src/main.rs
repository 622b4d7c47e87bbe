mod config;
mod db;
mod error;
mod routes;
mod services;
mod state;

use clap::Parser;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};

const DEFAULT_LOG_FILTER: &str = "gamehub=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();

    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .expect("database connection failed");

    match config.command.unwrap_or_default() {
        Command::Migrate => {
            db::migrate(&pool).await.expect("migrations failed");
            tracing::info!("migrations applied");
        }
        Command::Serve => serve(&config, pool).await,
    }
}

async fn serve(config: &Config, pool: PgPool) {
    if config.auto_migrate {
        db::migrate(&pool).await.expect("migrations failed");
    }

    match services::session::purge_expired_sessions(&pool).await {
        Ok(purged) => tracing::info!(purged, "removed expired sessions"),
        Err(e) => tracing::warn!(error = %e, "expired session cleanup failed"),
    }

    let state = state::AppState::new(pool, config.session_settings());
    let app = routes::app(state, &config.static_dir);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, static_dir = %config.static_dir.display(), "gamehub listening");
    axum::serve(listener, app).await.expect("server failed");
}
