//! ShortLink entity representing a short code and its target.

use chrono::{DateTime, Duration, Utc};

use super::click::ClickRecord;

/// A short code mapped to a target URL, together with its click history.
///
/// Links are never deleted. Once `expires_at` has passed they are kept for
/// statistics but no longer redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub click_count: i64,
    pub clicks: Vec<ClickRecord>,
}

impl ShortLink {
    /// Builds a link that has not been clicked yet.
    pub fn from_new(new_link: NewShortLink) -> Self {
        Self {
            code: new_link.code,
            target_url: new_link.target_url,
            created_at: new_link.created_at,
            expires_at: new_link.expires_at,
            click_count: 0,
            clicks: Vec::new(),
        }
    }

    /// Returns true if `now` is past the expiry time.
    ///
    /// A link is still valid at the exact instant of `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for persisting a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewShortLink {
    /// Creates a link valid for `validity_minutes` starting at `created_at`.
    ///
    /// Returns `None` when the expiry cannot be represented.
    pub fn new(
        code: String,
        target_url: String,
        created_at: DateTime<Utc>,
        validity_minutes: u32,
    ) -> Option<Self> {
        let expires_at =
            created_at.checked_add_signed(Duration::minutes(i64::from(validity_minutes)))?;

        Some(Self {
            code,
            target_url,
            created_at,
            expires_at,
        })
    }
}
