//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation (the link registry)
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click recording
//! - [`services::stats_service::StatsService`] - Link statistics

pub mod services;
