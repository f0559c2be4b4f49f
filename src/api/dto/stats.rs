//! DTOs for single-link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::clicks::{ClickDetail, click_details};
use super::timestamp::iso_millis;
use crate::domain::entities::ShortLink;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub original_url: String,
    #[serde(serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "iso_millis")]
    pub expires_at: DateTime<Utc>,
    pub total_clicks: i64,
    pub click_details: Vec<ClickDetail>,
}

impl From<ShortLink> for StatsResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            original_url: link.target_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            total_clicks: link.click_count,
            click_details: click_details(link.clicks),
        }
    }
}
