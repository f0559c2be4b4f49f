//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::domain::entities::RequestMetadata;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::ClientIp;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the link; unknown codes are rejected without side effects
/// 2. Reject expired links with 410
/// 3. Record the click (IP, `Referer`, `User-Agent`, GeoIP location)
/// 4. Return `302 Found` with `Location` set to the stored target
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    client_ip: ClientIp,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let metadata = RequestMetadata::new(
        client_ip.into_string(),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
        headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()),
    );

    let target = state.redirect_service.resolve(&code, metadata).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
