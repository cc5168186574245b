//! API Routes
//!
//! Configures the Axum router with all grid server endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_sort_handler, get_cell_handler, get_page_handler, health_handler,
    put_cache_size_handler, put_page_handler, put_page_size_handler, put_rows_handler,
    put_sort_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /rows` - Replace the grid rows
/// - `GET /page` - Current page, optionally projected onto `columns`
/// - `PUT /sort` / `DELETE /sort` - Set, toggle or clear the sort column
/// - `PUT /page-size` - Change the page size
/// - `PUT /page` - Move to a page
/// - `PUT /cache-size` - Resize the resolver caches
/// - `GET /cell/:row` - Resolve one cell
/// - `GET /stats` - Resolver cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/rows", put(put_rows_handler))
        .route("/page", get(get_page_handler).put(put_page_handler))
        .route("/sort", put(put_sort_handler).delete(delete_sort_handler))
        .route("/page-size", put(put_page_size_handler))
        .route("/cache-size", put(put_cache_size_handler))
        .route("/cell/:row", get(get_cell_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
