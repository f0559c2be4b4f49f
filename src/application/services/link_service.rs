//! Short link creation service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_validator::normalize_target_url;

/// Validity applied when a request does not specify one.
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

/// Attempts made to find an unused random code before giving up.
pub const DEFAULT_CODE_ATTEMPTS: usize = 10;

/// Settings for [`LinkService`].
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Prefix for short links, e.g. `https://sho.rt`.
    pub base_url: String,
    pub default_validity_minutes: u32,
    pub max_code_attempts: usize,
}

impl LinkSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_validity_minutes: DEFAULT_VALIDITY_MINUTES,
            max_code_attempts: DEFAULT_CODE_ATTEMPTS,
        }
    }
}

/// A request to create a short link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub target_url: String,
    pub validity_minutes: Option<u32>,
    pub requested_code: Option<String>,
}

/// A freshly created link together with its fully-qualified short URL.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: ShortLink,
    pub short_link: String,
}

/// Service owning creation and uniqueness of short codes.
///
/// The store's unique constraint on `code` is the authoritative conflict
/// signal. The existence check before inserting only produces a clearer log
/// line; an insert that still loses a race is reported as a conflict for
/// requested codes and retried for generated ones.
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    settings: LinkSettings,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(repository: Arc<L>, settings: LinkSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Creates a short link.
    ///
    /// - `target_url` must be an absolute URL; `javascript:`, `data:`,
    ///   `vbscript:` and `file:` targets are refused
    /// - `validity_minutes` defaults to the configured validity (30)
    /// - `requested_code`, if given and not blank, must match
    ///   `[A-Za-z0-9_-]{4,10}`; otherwise a random 7-character code is generated
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL, code or validity.
    /// Returns [`AppError::Conflict`] if the requested code is taken.
    /// Returns [`AppError::CodeSpaceExhausted`] if no free random code was found.
    #[instrument(
        skip(self, request),
        fields(url = %request.target_url, shortcode = ?request.requested_code)
    )]
    pub async fn create(&self, request: CreateLink) -> Result<CreatedLink, AppError> {
        let target_url = match normalize_target_url(&request.target_url) {
            Ok(url) => url,
            Err(e) => {
                let url = request.target_url.trim();
                warn!(url = %url, reason = %e, "Invalid URL format provided");
                return Err(AppError::bad_request(
                    "A valid URL must be provided",
                    json!({ "url": url, "reason": e.to_string() }),
                ));
            }
        };

        let validity = request
            .validity_minutes
            .unwrap_or(self.settings.default_validity_minutes);

        if validity == 0 {
            warn!(validity, "Invalid validity provided");
            return Err(AppError::bad_request(
                "Validity must be a positive number of minutes",
                json!({ "validity": validity }),
            ));
        }

        let requested_code = request
            .requested_code
            .filter(|code| !code.trim().is_empty());

        let link = match requested_code {
            Some(code) => self.create_with_code(code, target_url, validity).await?,
            None => self.create_with_generated_code(target_url, validity).await?,
        };

        info!(
            shortcode = %link.code,
            original_url = %link.target_url,
            expires_at = %link.expires_at,
            "Successfully created short URL"
        );

        Ok(CreatedLink {
            short_link: self.short_url(&link.code),
            link,
        })
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    /// Checks that the backing store answers.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn create_with_code(
        &self,
        code: String,
        target_url: String,
        validity: u32,
    ) -> Result<ShortLink, AppError> {
        if let Err(e) = validate_custom_code(&code) {
            warn!(shortcode = %code, reason = %e, "Invalid custom shortcode format");
            return Err(e);
        }

        if self.repository.exists(&code).await? {
            warn!(shortcode = %code, "Custom shortcode already in use");
            return Err(shortcode_taken(&code));
        }

        let new_link = build_new_link(code.clone(), target_url, validity)?;

        match self.repository.insert(new_link).await {
            Err(AppError::Conflict { .. }) => {
                warn!(shortcode = %code, "Custom shortcode claimed concurrently");
                Err(shortcode_taken(&code))
            }
            other => other,
        }
    }

    async fn create_with_generated_code(
        &self,
        target_url: String,
        validity: u32,
    ) -> Result<ShortLink, AppError> {
        let attempts = self.settings.max_code_attempts;

        for attempt in 1..=attempts {
            let code = generate_code()?;

            if self.repository.exists(&code).await? {
                debug!(shortcode = %code, attempt, "Generated shortcode collided, retrying");
                continue;
            }

            let new_link = build_new_link(code.clone(), target_url.clone(), validity)?;

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    debug!(shortcode = %code, attempt, "Generated shortcode claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(attempts, url = %target_url, "Could not find a free shortcode");
        Err(AppError::code_space_exhausted(
            "Could not generate a unique shortcode, try again later",
            json!({ "attempts": attempts }),
        ))
    }
}

fn build_new_link(code: String, target_url: String, validity: u32) -> Result<NewShortLink, AppError> {
    NewShortLink::new(code, target_url, Utc::now(), validity).ok_or_else(|| {
        AppError::bad_request(
            "Validity is out of range",
            json!({ "validity": validity }),
        )
    })
}

fn shortcode_taken(code: &str) -> AppError {
    AppError::conflict(
        "This shortcode is already in use",
        json!({ "shortcode": code }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::is_generated_shape;
    use chrono::Duration;

    fn settings() -> LinkSettings {
        LinkSettings::new("https://sho.rt/")
    }

    fn echo_insert(mock: &mut MockLinkRepository) {
        mock.expect_insert()
            .returning(|new_link| Ok(ShortLink::from_new(new_link)));
    }

    fn request(url: &str, code: Option<&str>) -> CreateLink {
        CreateLink {
            target_url: url.to_string(),
            validity_minutes: None,
            requested_code: code.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().times(1).returning(|_| Ok(false));
        echo_insert(&mut mock_repo);

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let created = service
            .create(request("https://example.com", None))
            .await
            .unwrap();

        assert!(is_generated_shape(&created.link.code));
        assert_eq!(created.link.target_url, "https://example.com");
        assert_eq!(
            created.short_link,
            format!("https://sho.rt/{}", created.link.code)
        );
        assert_eq!(
            created.link.expires_at - created.link.created_at,
            Duration::minutes(30)
        );
    }

    #[tokio::test]
    async fn test_create_with_custom_code_and_validity() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_exists()
            .withf(|code| code == "test01")
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .withf(|new_link| new_link.code == "test01")
            .times(1)
            .returning(|new_link| Ok(ShortLink::from_new(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let created = service
            .create(CreateLink {
                target_url: "https://example.com".to_string(),
                validity_minutes: Some(1),
                requested_code: Some("test01".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.link.code, "test01");
        assert_eq!(created.short_link, "https://sho.rt/test01");
        assert_eq!(
            created.link.expires_at - created.link.created_at,
            Duration::minutes(1)
        );
    }

    #[tokio::test]
    async fn test_create_invalid_url_touches_nothing() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().times(0);
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo), settings());

        for url in ["not-a-url", "", "javascript:alert(1)"] {
            let result = service.create(request(url, None)).await;
            assert!(matches!(result, Err(AppError::Validation { .. })), "{url}");
        }
    }

    #[tokio::test]
    async fn test_create_stores_header_safe_target() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .withf(|new_link| new_link.target_url == "https://example.com/ab")
            .times(1)
            .returning(|new_link| Ok(ShortLink::from_new(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let created = service
            .create(request("https://example.com/a\nb", Some("nl0001")))
            .await
            .unwrap();

        assert_eq!(created.link.target_url, "https://example.com/ab");
    }

    #[tokio::test]
    async fn test_create_blank_code_generates_one() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().times(2).returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .withf(|new_link| is_generated_shape(&new_link.code))
            .times(2)
            .returning(|new_link| Ok(ShortLink::from_new(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), settings());

        for code in ["", "   "] {
            let created = service
                .create(request("https://example.com", Some(code)))
                .await
                .unwrap();
            assert!(is_generated_shape(&created.link.code), "{code:?}");
        }
    }

    #[tokio::test]
    async fn test_create_invalid_custom_code_touches_nothing() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().times(0);
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo), settings());

        for code in ["abc", "waytoolongcode", "bad code", "sp@cial"] {
            let result = service
                .create(request("https://example.com", Some(code)))
                .await;
            assert!(matches!(result, Err(AppError::Validation { .. })), "{code}");
        }
    }

    #[tokio::test]
    async fn test_create_zero_validity_rejected() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let result = service
            .create(CreateLink {
                target_url: "https://example.com".to_string(),
                validity_minutes: Some(0),
                requested_code: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_custom_code_conflict() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_exists()
            .withf(|code| code == "taken1")
            .times(1)
            .returning(|_| Ok(true));
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let result = service
            .create(request("https://example.com", Some("taken1")))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_custom_code_lost_race_is_conflict() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().times(1).returning(|_| Ok(false));
        mock_repo.expect_insert().times(1).returning(|_| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({}),
            ))
        });

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let err = service
            .create(request("https://example.com", Some("race01")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), "This shortcode is already in use");
    }

    #[tokio::test]
    async fn test_generated_code_retries_on_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_exists()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        mock_repo
            .expect_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        echo_insert(&mut mock_repo);

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let created = service
            .create(request("https://example.com", None))
            .await
            .unwrap();

        assert!(is_generated_shape(&created.link.code));
    }

    #[tokio::test]
    async fn test_generated_code_retries_when_insert_conflicts() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo.expect_exists().returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));
        mock_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(ShortLink::from_new(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), settings());

        assert!(
            service
                .create(request("https://example.com", None))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_generated_code_exhaustion() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_exists().times(3).returning(|_| Ok(true));
        mock_repo.expect_insert().times(0);

        let mut settings = settings();
        settings.max_code_attempts = 3;
        let service = LinkService::new(Arc::new(mock_repo), settings);

        let result = service.create(request("https://example.com", None)).await;

        assert!(matches!(result, Err(AppError::CodeSpaceExhausted { .. })));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_exists()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = LinkService::new(Arc::new(mock_repo), settings());

        let result = service.create(request("https://example.com", None)).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            LinkSettings::new("http://localhost:3000///"),
        );

        assert_eq!(service.short_url("abcd"), "http://localhost:3000/abcd");
    }
}
