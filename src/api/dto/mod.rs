//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Field names are camelCase on the wire and every
//! timestamp is ISO-8601 UTC with millisecond precision.

pub mod clicks;
pub mod health;
pub mod links;
pub mod shorten;
pub mod stats;
pub mod timestamp;
