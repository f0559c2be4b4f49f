//! Handler for detailed link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves statistics for a specific short link.
///
/// # Endpoint
///
/// `GET /api/shorturls/{code}`
///
/// # Response
///
/// ```json
/// {
///   "originalUrl": "https://example.com",
///   "createdAt": "2026-01-01T00:00:00.000Z",
///   "expiresAt": "2026-01-01T00:30:00.000Z",
///   "totalClicks": 1,
///   "clickDetails": [
///     {
///       "timestamp": "2026-01-01T00:05:00.000Z",
///       "ipAddress": "81.2.69.142",
///       "referrer": "Direct",
///       "location": "London, GB"
///     }
///   ]
/// }
/// ```
///
/// Expired links are still reported.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.stats_service.get_stats(&code).await?;

    Ok(Json(link.into()))
}
