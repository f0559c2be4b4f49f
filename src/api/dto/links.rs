//! DTOs for the link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::clicks::{ClickDetail, click_details};
use super::timestamp::iso_millis;
use crate::domain::entities::ShortLink;

/// Full snapshot of a link as listed by `GET /api/shorturls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSnapshot {
    pub shortcode: String,
    pub long_url: String,
    #[serde(serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "iso_millis")]
    pub expires_at: DateTime<Utc>,
    pub click_count: i64,
    pub click_details: Vec<ClickDetail>,
}

impl From<ShortLink> for LinkSnapshot {
    fn from(link: ShortLink) -> Self {
        Self {
            shortcode: link.code,
            long_url: link.target_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
            click_details: click_details(link.clicks),
        }
    }
}
