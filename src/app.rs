//! Application state and router assembly.

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, ConfigError, SiteRules};
use crate::handlers;
use crate::middleware;

const USER_AGENT: &str = concat!("jobboard-web/", env!("CARGO_PKG_VERSION"));

/// Shared by every handler via `State<AppState>`
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub site_rules: Arc<SiteRules>,
    pub http: reqwest::Client,
    /// Used only by the image proxy; never follows redirects
    pub image_http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let site_rules = config.site.compile()?;
        let timeout = Duration::from_secs(config.backend.request_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let image_http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            site_rules: Arc::new(site_rules),
            http,
            image_http,
        })
    }
}

/// Build the complete router. Site rules wrap everything, so redirects run
/// before routing and headers land on every response, including 404s.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(page_routes())
        .merge(api_routes())
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(middleware::route_guard));

    if state.config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if state.config.security.enable_cors {
        router = router.layer(build_cors_layer(&state.config.security.cors_origins));
    }

    router
        .layer(axum_middleware::from_fn_with_state(
            state.site_rules.clone(),
            middleware::apply_site_rules,
        ))
        .with_state(state)
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/test-dropdown", get(handlers::test_dropdown))
        .route("/_image", get(handlers::proxy_image))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/test-connection", get(handlers::test_connection))
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(origins)
}
