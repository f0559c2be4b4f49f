//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::warn;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorturls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "validity": 30,        // optional, minutes
///   "shortcode": "test01"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortLink": "http://localhost:3000/test01",
///   "expiry": "2026-01-01T00:30:00.000Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body, invalid URL, shortcode or validity
/// - 409 if the requested shortcode is taken
/// - 503 if no free random shortcode could be found
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.inspect_err(|e| {
        warn!(reason = %e.body_text(), "Rejected malformed shorten request");
    })?;

    payload.validate().inspect_err(|e| {
        warn!(url = %payload.url, errors = %e, "Shorten request failed validation");
    })?;

    let created = state.link_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
