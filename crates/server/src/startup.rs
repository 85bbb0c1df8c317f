use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::runtime;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load config.toml, or fall back to env vars when the file is absent.
fn load_config() -> Result<AppConfig, StartupError> {
    load_config_from(&configs::config_path())
}

fn load_config_from(path: &str) -> Result<AppConfig, StartupError> {
    let loaded = configs::load_optional(path).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let mut cfg = match loaded {
        Some(cfg) => cfg,
        None => {
            warn!(%path, "config file not found; using environment");
            let mut cfg = AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg.database.url = models::db::DATABASE_URL.clone();
            cfg
        }
    };
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: connect, migrate, build the app and run the HTTP server
/// until Ctrl+C.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    runtime::ensure_env(&cfg.server.static_dir, "data").await?;

    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database))
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    let state = ServerState::new(db);
    let app: Router = routes::build_router(state, build_cors(), &cfg.server.static_dir);

    let addr = bind_addr(&cfg)?;
    info!(%addr, static_dir = %cfg.server.static_dir, "starting employee server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
