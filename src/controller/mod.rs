use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::info;
use crate::config::ServeConfig;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::google_places_repo::GooglePlacesRepo;
use crate::services::restaurant_finder::{FinderSettings, RestaurantFinder};

pub mod health_check;
pub mod restaurant_controller;

#[derive(Clone)]
pub struct AppState {
    pub restaurant_finder: Arc<RestaurantFinder>,
}

impl AppState {
    pub fn from_config(config: &ServeConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build the places HTTP client")?;

        let page_token_delay = Duration::from_millis(config.page_token_delay_ms);
        let places_repo = Arc::new(GooglePlacesRepo::new(
            client,
            config.places_base_url.clone(),
            config.google_api_key.clone(),
            page_token_delay,
        ));

        let settings = FinderSettings {
            search_radius_meters: config.search_radius_meters,
            max_results: config.max_results,
            page_token_delay,
            promotion_keywords: config.promotion_keywords.clone(),
        };

        Ok(Self {
            restaurant_finder: Arc::new(RestaurantFinder::new(places_repo, settings)),
        })
    }
}

pub async fn serve(
    app_state: AppState,
    config: &ServeConfig,
) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().with_context(|| format!("Invalid origin url: {}", s)))
        .collect::<anyhow::Result<Vec<HeaderValue>>>()?;

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
                .layer(CompressionLayer::new())
                .layer(GlobalConcurrencyLimitLayer::new(config.max_concurrent_searches))
        )
        .fallback(page_not_found_handler);

    let host = config.host.parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid host: {}", config.host))?;
    let address = SocketAddr::new(host, config.port);
    info!("API server listening on: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .merge(restaurant_controller::router(app_state))
}
