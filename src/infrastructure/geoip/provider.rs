//! GeoIP lookup abstraction and provider selection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::maxmind::MaxMindProvider;
use super::null_geoip::NullGeoIp;
use crate::domain::entities::click::UNKNOWN_LOCATION;

/// Coarse geographic information for an IP address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 country code (e.g. "DE", "US").
    pub country: Option<String>,
    pub city: Option<String>,
}

/// IP geolocation lookup.
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// Resolves an IP address. Returns `None` when nothing is known about it.
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// Provider name, used in logs and health checks.
    fn name(&self) -> &'static str;
}

/// Formats lookup output the way it is stored on click records.
///
/// - city and country: `"Berlin, DE"`
/// - only one of them: that value
/// - nothing: `"Unknown"`
pub fn format_location(info: Option<GeoInfo>) -> String {
    let Some(info) = info else {
        return UNKNOWN_LOCATION.to_string();
    };

    match (info.city, info.country) {
        (Some(city), Some(country)) => format!("{city}, {country}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => UNKNOWN_LOCATION.to_string(),
    }
}

/// Selects the provider at startup.
///
/// Uses the MaxMind database when `database_path` is set and readable, and
/// falls back to [`NullGeoIp`] otherwise.
pub fn build_provider(database_path: Option<&str>) -> Arc<dyn GeoIpLookup> {
    let provider: Arc<dyn GeoIpLookup> = match database_path {
        Some(path) => match MaxMindProvider::new(path) {
            Ok(provider) => {
                info!(path, "GeoIP: Using MaxMind database");
                Arc::new(provider)
            }
            Err(e) => {
                warn!(path, error = %e, "GeoIP: Failed to load MaxMind database, locations will be Unknown");
                Arc::new(NullGeoIp::new())
            }
        },
        None => Arc::new(NullGeoIp::new()),
    };

    info!(provider = provider.name(), "GeoIP initialized");
    provider
}
