//! Click entity representing a single redirect.

use chrono::{DateTime, Utc};

/// Referrer stored when the request carried no `Referer` header.
pub const DIRECT_REFERRER: &str = "Direct";

/// Location stored when the client IP could not be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// A visit recorded when a short link redirected successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickRecord {
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub referrer: String,
    pub location: String,
    pub user_agent: Option<String>,
}

/// Input data for recording a click.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub referrer: String,
    pub location: String,
    pub user_agent: Option<String>,
}

impl From<NewClick> for ClickRecord {
    fn from(click: NewClick) -> Self {
        Self {
            timestamp: click.timestamp,
            ip_address: click.ip_address,
            referrer: click.referrer,
            location: click.location,
            user_agent: click.user_agent,
        }
    }
}

/// Caller information captured by the redirect endpoint.
///
/// All fields are optional; the recorder fills in defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMetadata {
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMetadata {
    pub fn new(ip: Option<String>, referrer: Option<&str>, user_agent: Option<&str>) -> Self {
        Self {
            ip,
            referrer: referrer.map(|s| s.to_string()),
            user_agent: user_agent.map(|s| s.to_string()),
        }
    }

    /// Referrer to store, falling back to [`DIRECT_REFERRER`] when absent or blank.
    pub fn referrer_or_direct(&self) -> String {
        match self.referrer.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => DIRECT_REFERRER.to_string(),
        }
    }

    /// Builds the click to persist for this request.
    pub fn into_click(self, timestamp: DateTime<Utc>, location: String) -> NewClick {
        let referrer = self.referrer_or_direct();

        NewClick {
            timestamp,
            ip_address: self.ip,
            referrer,
            location,
            user_agent: self.user_agent,
        }
    }
}
