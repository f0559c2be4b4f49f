#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

use linkstamp::application::services::LinkSettings;
use linkstamp::domain::entities::{NewShortLink, ShortLink};
use linkstamp::infrastructure::geoip::NullGeoIp;
use linkstamp::infrastructure::persistence::MemoryLinkRepository;
use linkstamp::routes::router;
use linkstamp::state::AppState;

pub const BASE_URL: &str = "http://sho.rt";
pub const PEER_IP: &str = "127.0.0.1";

/// Inserts a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = format!("{PEER_IP}:12345").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_test_state(behind_proxy: bool) -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());

    let state = AppState::new(
        repo.clone(),
        Arc::new(NullGeoIp::new()),
        LinkSettings::new(BASE_URL),
        behind_proxy,
    );

    (state, repo)
}

/// Full application router over a fresh in-memory store.
pub fn create_test_server() -> (TestServer, Arc<MemoryLinkRepository>) {
    create_test_server_with(false)
}

pub fn create_test_server_with(behind_proxy: bool) -> (TestServer, Arc<MemoryLinkRepository>) {
    let (state, repo) = create_test_state(behind_proxy);
    let app: Router = router(state, &[]).layer(MockConnectInfoLayer);

    (TestServer::new(app).unwrap(), repo)
}

pub fn link_created_ago(code: &str, url: &str, minutes_ago: i64, validity: u32) -> ShortLink {
    ShortLink::from_new(
        NewShortLink::new(
            code.to_string(),
            url.to_string(),
            Utc::now() - Duration::minutes(minutes_ago),
            validity,
        )
        .unwrap(),
    )
}

/// Stores a link whose expiry is already in the past.
pub async fn create_expired_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    let link = link_created_ago(code, url, 120, 60);
    repo.put(link.clone()).await;
    link
}

pub async fn create_test_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    let link = link_created_ago(code, url, 0, 30);
    repo.put(link.clone()).await;
    link
}

/// Shifts a stored link's timestamps into the past, as if `minutes` had elapsed.
pub async fn age_link(repo: &MemoryLinkRepository, code: &str, minutes: i64) {
    use linkstamp::domain::repositories::LinkRepository;

    let mut link = repo.find_by_code(code).await.unwrap().unwrap();
    link.created_at -= Duration::minutes(minutes);
    link.expires_at -= Duration::minutes(minutes);
    repo.put(link).await;
}
