//! Handler for the link listing endpoint.

use axum::{Json, extract::State};

use crate::api::dto::links::LinkSnapshot;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every link with its click history, newest first.
///
/// # Endpoint
///
/// `GET /api/shorturls`
pub async fn stats_list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkSnapshot>>, AppError> {
    let links = state.stats_service.list_all().await?;

    Ok(Json(links.into_iter().map(LinkSnapshot::from).collect()))
}
