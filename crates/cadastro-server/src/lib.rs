#![forbid(unsafe_code)]

use axum::routing::{delete, get};
use axum::Router;
use cadastro_store::RegistryStore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::Mutex;

mod config;
mod http;

pub use config::ApiConfig;

pub const CRATE_NAME: &str = "cadastro-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<RegistryStore>>,
    pub api: Arc<ApiConfig>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: RegistryStore, api: ApiConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            api: Arc::new(api),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::meta::healthz_handler))
        .route("/v1/version", get(http::meta::version_handler))
        .route("/v1/categories", get(http::meta::categories_handler))
        .route(
            "/v1/suppliers",
            get(http::suppliers::list_handler).post(http::suppliers::create_handler),
        )
        .route(
            "/v1/suppliers/:id",
            get(http::suppliers::fetch_handler)
                .put(http::suppliers::update_handler)
                .delete(http::suppliers::delete_handler),
        )
        .route(
            "/v1/suppliers/:id/products",
            get(http::suppliers::products_handler),
        )
        .route(
            "/v1/products",
            get(http::products::list_handler).post(http::products::create_handler),
        )
        .route(
            "/v1/products/:id",
            get(http::products::fetch_handler)
                .put(http::products::update_handler)
                .delete(http::products::delete_handler),
        )
        .route(
            "/v1/associations",
            get(http::associations::list_handler).post(http::associations::create_handler),
        )
        .route(
            "/v1/associations/:id",
            delete(http::associations::delete_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            http::timeout_middleware,
        ))
        .layer(axum::extract::DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
