//! DTOs for click history entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::timestamp::iso_millis;
use crate::domain::entities::ClickRecord;

/// One recorded visit.
///
/// `ipAddress` is `null` when the caller's address could not be determined;
/// `userAgent` is omitted when the client sent none.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickDetail {
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub referrer: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl From<ClickRecord> for ClickDetail {
    fn from(click: ClickRecord) -> Self {
        Self {
            timestamp: click.timestamp,
            ip_address: click.ip_address,
            referrer: click.referrer,
            location: click.location,
            user_agent: click.user_agent,
        }
    }
}

pub fn click_details(clicks: Vec<ClickRecord>) -> Vec<ClickDetail> {
    clicks.into_iter().map(ClickDetail::from).collect()
}
