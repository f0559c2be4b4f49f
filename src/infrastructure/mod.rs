//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`geoip`] - IP geolocation (MaxMind and no-op implementations)
//! - [`persistence`] - Link storage (PostgreSQL and in-memory implementations)

pub mod geoip;
pub mod persistence;
