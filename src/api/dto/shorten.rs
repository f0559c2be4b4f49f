//! DTOs for the link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp::iso_millis;
use crate::application::services::{CreateLink, CreatedLink};

/// Longest validity accepted from clients: one year.
pub const MAX_VALIDITY_MINUTES: u32 = 525_600;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL; checked by the link service.
    pub url: String,

    /// Lifetime in minutes (default: 30).
    #[validate(range(
        min = 1,
        max = MAX_VALIDITY_MINUTES,
        message = "Validity must be between 1 and 525600 minutes"
    ))]
    pub validity: Option<u32>,

    /// Optional custom short code.
    pub shortcode: Option<String>,
}

impl From<ShortenRequest> for CreateLink {
    fn from(request: ShortenRequest) -> Self {
        Self {
            target_url: request.url,
            validity_minutes: request.validity,
            requested_code: request.shortcode,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_link: String,
    #[serde(serialize_with = "iso_millis")]
    pub expiry: DateTime<Utc>,
}

impl From<CreatedLink> for ShortenResponse {
    fn from(created: CreatedLink) -> Self {
        Self {
            short_link: created.short_link,
            expiry: created.link.expires_at,
        }
    }
}
