//! API route configuration.

use crate::api::handlers::{shorten_handler, stats_handler, stats_list_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorturls`        - Create a short link
/// - `GET  /shorturls`        - List all links with click history
/// - `GET  /shorturls/{code}` - Statistics for a single link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shorturls",
            get(stats_list_handler).post(shorten_handler),
        )
        .route("/shorturls/{code}", get(stats_handler))
}
