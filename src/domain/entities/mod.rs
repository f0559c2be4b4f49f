//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A short code mapped to a target URL, with its click history
//! - [`ClickRecord`] - One recorded visit to a short link
//!
//! Creation inputs live next to the entity they produce
//! ([`NewShortLink`], [`NewClick`]), and [`RequestMetadata`] carries the
//! caller information captured by the redirect endpoint.

pub mod click;
pub mod link;

pub use click::{ClickRecord, NewClick, RequestMetadata};
pub use link::{NewShortLink, ShortLink};
