//! Link statistics service.

use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use serde_json::json;
use tracing::{info, warn};

/// Read-only access to links and their click history.
pub struct StatsService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> StatsService<L> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<L>) -> Self {
        Self { repository }
    }

    /// Returns a snapshot of a single link, clicks included.
    ///
    /// Expired links are still reported.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses `code`.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_stats(&self, code: &str) -> Result<ShortLink, AppError> {
        match self.repository.find_by_code(code).await? {
            Some(link) => {
                info!(shortcode = code, "Fetched statistics for shortcode");
                Ok(link)
            }
            None => {
                warn!(shortcode = code, "Statistics requested for non-existent shortcode");
                Err(AppError::not_found(
                    "Statistics not found for this shortcode",
                    json!({ "shortcode": code }),
                ))
            }
        }
    }

    /// Returns every link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_all(&self) -> Result<Vec<ShortLink>, AppError> {
        let links = self.repository.list_all().await?;
        info!(count = links.len(), "Fetched all URL entries");
        Ok(links)
    }
}
