//! Repository trait definitions for the domain layer.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage, lookups and click recording
//!
//! Implementations live in `crate::infrastructure::persistence`. Mock
//! implementations are generated via `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
