//! Business logic services for the application layer.

pub mod link_service;
pub mod redirect_service;
pub mod stats_service;

pub use link_service::{CreateLink, CreatedLink, LinkService, LinkSettings};
pub use redirect_service::RedirectService;
pub use stats_service::StatsService;
