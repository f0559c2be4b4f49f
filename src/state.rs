//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, LinkSettings, RedirectService, StatsService};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::geoip::GeoIpLookup;

pub type DynLinkService = LinkService<dyn LinkRepository>;
pub type DynRedirectService = RedirectService<dyn LinkRepository>;
pub type DynStatsService = StatsService<dyn LinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub redirect_service: Arc<DynRedirectService>,
    pub stats_service: Arc<DynStatsService>,
    pub geoip: Arc<dyn GeoIpLookup>,
    /// When true, client IPs are read from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires all services on top of a single repository.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        geoip: Arc<dyn GeoIpLookup>,
        settings: LinkSettings,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository.clone(), settings)),
            redirect_service: Arc::new(RedirectService::new(repository.clone(), geoip.clone())),
            stats_service: Arc::new(StatsService::new(repository)),
            geoip,
            behind_proxy,
        }
    }
}
