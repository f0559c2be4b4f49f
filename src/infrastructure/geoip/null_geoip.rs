//! No-op GeoIP implementation.

use super::provider::{GeoInfo, GeoIpLookup};
use async_trait::async_trait;
use tracing::debug;

/// A lookup that never resolves anything.
///
/// Used when no MaxMind database is configured or it failed to load, and in
/// tests. Clicks are still recorded, with location `Unknown`.
pub struct NullGeoIp;

impl NullGeoIp {
    pub fn new() -> Self {
        debug!("Using NullGeoIp (geolocation disabled)");
        Self
    }
}

impl Default for NullGeoIp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoIpLookup for NullGeoIp {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
