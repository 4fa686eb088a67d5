mod handlers;
mod views;

use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::inventory::Inventory;

/// Build the router with permissive CORS.
pub fn create_router(inventory: Inventory) -> Router {
    build_router(inventory, CorsLayer::permissive())
}

/// Build the router, restricting CORS to the configured origins if any.
pub fn create_router_with_config(inventory: Inventory, config: &Config) -> Router {
    let cors = match &config.cors_origins {
        Some(origins) => {
            let mut allowed = Vec::new();
            for origin in origins {
                match origin.parse::<HeaderValue>() {
                    Ok(v) => allowed.push(v),
                    Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
                }
            }
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    build_router(inventory, cors)
}

fn build_router(inventory: Inventory, cors: CorsLayer) -> Router {
    let static_files = ServeDir::new(inventory.codes().static_dir());

    Router::new()
        // Pages
        .route("/", get(handlers::index_page))
        .route("/scan", get(handlers::scan_page))
        .route("/item/{id}", get(handlers::item_page))
        // Equipment
        .route("/equipment", get(handlers::list_equipment))
        .route("/equipment/add", post(handlers::add_equipment))
        .route("/equipment/{id}", get(handlers::get_equipment))
        .route("/equipment/{id}/status", patch(handlers::update_status))
        .route("/equipment/{id}/history", post(handlers::add_history_entry))
        // Health
        .route("/health", get(handlers::health))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(inventory)
}
