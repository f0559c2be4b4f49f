//! In-process implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewClick, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link repository backed by a `HashMap` behind an async `RwLock`.
///
/// Every mutation takes the write lock, so the uniqueness check in
/// [`LinkRepository::insert`] and the append in
/// [`LinkRepository::record_click`] are atomic. Data is lost on restart;
/// intended for development (`STORAGE_BACKEND=memory`) and tests.
#[derive(Default)]
pub struct MemoryLinkRepository {
    links: RwLock<HashMap<String, ShortLink>>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a link as-is, replacing any existing one with the same code.
    ///
    /// Used to seed fixtures such as already-expired links.
    pub async fn put(&self, link: ShortLink) {
        self.links.write().await.insert(link.code.clone(), link);
    }

    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut links = self.links.write().await;

        if links.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_links_pkey" }),
            ));
        }

        let link = ShortLink::from_new(new_link);
        links.insert(link.code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.read().await.get(code).cloned())
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.read().await.contains_key(code))
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self.links.read().await.values().cloned().collect();

        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        Ok(links)
    }

    async fn record_click(&self, code: &str, click: NewClick) -> Result<bool, AppError> {
        let mut links = self.links.write().await;

        let Some(link) = links.get_mut(code) else {
            return Ok(false);
        };

        // Keep clicks ordered by timestamp even if a slower request appends late.
        let position = link
            .clicks
            .partition_point(|existing| existing.timestamp <= click.timestamp);
        link.clicks.insert(position, click.into());
        link.click_count += 1;

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
