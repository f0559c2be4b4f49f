//! Redirect resolution and click recording.

use std::sync::Arc;

use axum::http::HeaderValue;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::domain::entities::RequestMetadata;
use crate::domain::entities::click::UNKNOWN_LOCATION;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::geoip::{GeoIpLookup, format_location};

/// Service resolving short codes to their targets.
///
/// Every successful resolution records a click with the caller's referrer and
/// approximate location before the target is returned.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    geoip: Arc<dyn GeoIpLookup>,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<L>, geoip: Arc<dyn GeoIpLookup>) -> Self {
        Self { repository, geoip }
    }

    /// Resolves `code` and records the visit.
    ///
    /// Returns the target URL to redirect to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses `code`; the store is not
    /// touched in that case.
    /// Returns [`AppError::Gone`] if the link has expired; it is kept, not removed.
    /// Returns [`AppError::Internal`] on storage errors, or if the stored
    /// target cannot be sent as a `Location` header; no click is recorded.
    #[instrument(skip(self, metadata), fields(ip = ?metadata.ip))]
    pub async fn resolve(&self, code: &str, metadata: RequestMetadata) -> Result<String, AppError> {
        let Some(link) = self.repository.find_by_code(code).await? else {
            warn!(shortcode = code, "Shortcode not found");
            return Err(shortcode_not_found(code));
        };

        let now = Utc::now();
        if link.is_expired_at(now) {
            info!(shortcode = code, expired_at = %link.expires_at, "Attempted to access expired link");
            return Err(AppError::gone(
                "This link has expired",
                json!({ "shortcode": code, "expiredAt": link.expires_at }),
            ));
        }

        if HeaderValue::from_str(&link.target_url).is_err() {
            error!(shortcode = code, target = ?link.target_url, "Stored target is not a valid Location header");
            return Err(AppError::internal(
                "This link cannot be redirected",
                json!({ "shortcode": code }),
            ));
        }

        let location = match metadata.ip.as_deref() {
            Some(ip) => format_location(self.geoip.lookup(ip).await),
            None => UNKNOWN_LOCATION.to_string(),
        };

        let click = metadata.into_click(Utc::now(), location);

        if !self.repository.record_click(code, click).await? {
            warn!(shortcode = code, "Shortcode disappeared while recording click");
            return Err(shortcode_not_found(code));
        }

        info!(shortcode = code, target = %link.target_url, "Redirecting short URL");

        Ok(link.target_url)
    }
}

fn shortcode_not_found(code: &str) -> AppError {
    AppError::not_found("Shortcode not found", json!({ "shortcode": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewShortLink, ShortLink};
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::geoip::{GeoInfo, NullGeoIp};
    use async_trait::async_trait;
    use chrono::Duration;

    struct FixedGeoIp;

    #[async_trait]
    impl GeoIpLookup for FixedGeoIp {
        async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
            (ip == "81.2.69.142").then(|| GeoInfo {
                country: Some("GB".to_string()),
                city: Some("London".to_string()),
            })
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn link(code: &str, created_minutes_ago: i64, validity: u32) -> ShortLink {
        ShortLink::from_new(
            NewShortLink::new(
                code.to_string(),
                "https://example.com/target".to_string(),
                Utc::now() - Duration::minutes(created_minutes_ago),
                validity,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_resolve_records_click_and_returns_target() {
        let mut mock_repo = MockLinkRepository::new();
        let found = link("abcd", 0, 30);
        mock_repo
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo
            .expect_record_click()
            .withf(|code, click| {
                code == "abcd"
                    && click.referrer == "https://google.com"
                    && click.location == "London, GB"
                    && click.ip_address.as_deref() == Some("81.2.69.142")
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let service = RedirectService::new(Arc::new(mock_repo), Arc::new(FixedGeoIp));

        let target = service
            .resolve(
                "abcd",
                RequestMetadata::new(
                    Some("81.2.69.142".to_string()),
                    Some("https://google.com"),
                    None,
                ),
            )
            .await
            .unwrap();

        assert_eq!(target, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_defaults_referrer_and_location() {
        let mut mock_repo = MockLinkRepository::new();
        let found = link("abcd", 0, 30);
        mock_repo
            .expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo
            .expect_record_click()
            .withf(|_, click| click.referrer == "Direct" && click.location == "Unknown")
            .times(1)
            .returning(|_, _| Ok(true));

        let service = RedirectService::new(Arc::new(mock_repo), Arc::new(FixedGeoIp));

        let metadata = RequestMetadata::new(Some("10.0.0.1".to_string()), None, None);
        assert!(service.resolve("abcd", metadata).await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_does_not_mutate() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_code().returning(|_| Ok(None));
        mock_repo.expect_record_click().times(0);

        let service = RedirectService::new(Arc::new(mock_repo), Arc::new(NullGeoIp::new()));

        let result = service.resolve("nope", RequestMetadata::default()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_expired_link_is_gone() {
        let mut mock_repo = MockLinkRepository::new();
        let expired = link("old1", 10, 1);
        mock_repo
            .expect_find_by_code()
            .returning(move |_| Ok(Some(expired.clone())));
        mock_repo.expect_record_click().times(0);

        let service = RedirectService::new(Arc::new(mock_repo), Arc::new(NullGeoIp::new()));

        let result = service.resolve("old1", RequestMetadata::default()).await;

        assert!(matches!(result, Err(AppError::Gone { .. })));
    }

    #[tokio::test]
    async fn test_resolve_unsendable_target_records_nothing() {
        let mut mock_repo = MockLinkRepository::new();
        let mut broken = link("nl0001", 0, 30);
        broken.target_url = "https://example.com/a\nb".to_string();
        mock_repo
            .expect_find_by_code()
            .returning(move |_| Ok(Some(broken.clone())));
        mock_repo.expect_record_click().times(0);

        let service = RedirectService::new(Arc::new(mock_repo), Arc::new(NullGeoIp::new()));

        let result = service.resolve("nl0001", RequestMetadata::default()).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_resolve_link_vanishing_mid_request_is_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        let found = link("gone", 0, 30);
        mock_repo
            .expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo.expect_record_click().returning(|_, _| Ok(false));

        let service = RedirectService::new(Arc::new(mock_repo), Arc::new(NullGeoIp::new()));

        let result = service.resolve("gone", RequestMetadata::default()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
