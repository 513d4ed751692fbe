#![forbid(unsafe_code)]

use cadastro_server::{build_router, ApiConfig, AppState};
use cadastro_store::RegistryStore;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CADASTRO_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn config_from_env() -> ApiConfig {
    let defaults = ApiConfig::default();
    ApiConfig {
        bind_addr: env_string("CADASTRO_BIND", &defaults.bind_addr),
        db_path: PathBuf::from(env_string(
            "CADASTRO_DB",
            &defaults.db_path.to_string_lossy(),
        )),
        max_body_bytes: env_usize("CADASTRO_MAX_BODY_BYTES", defaults.max_body_bytes),
        request_timeout: env_duration_ms("CADASTRO_TIMEOUT_MS", defaults.request_timeout),
        default_page_size: env_usize("CADASTRO_PAGE_SIZE", defaults.default_page_size),
        max_page_size: env_usize("CADASTRO_MAX_PAGE_SIZE", defaults.max_page_size),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config = config_from_env();
    let store = RegistryStore::open(&config.db_path)
        .map_err(|e| format!("open store at {}: {e}", config.db_path.display()))?;
    info!(db = %config.db_path.display(), "store ready");

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(store, config));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr}: {e}"))?;
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(|e| format!("server error: {e}"))
}
