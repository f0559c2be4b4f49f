//! IP geolocation for click analytics.
//!
//! Provides a [`GeoIpLookup`] trait with two implementations:
//! - [`MaxMindProvider`] - Local MaxMind GeoLite2-City database
//! - [`NullGeoIp`] - Resolves nothing; every click is recorded as `Unknown`

mod maxmind;
mod null_geoip;
mod provider;

pub use maxmind::MaxMindProvider;
pub use null_geoip::NullGeoIp;
pub use provider::{GeoInfo, GeoIpLookup, build_provider, format_location};
