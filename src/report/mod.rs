use std::time::Duration;
use anyhow::Context;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use crate::config::ReportConfig;
use crate::models::restaurant::RestaurantSummary;
use crate::report::layout::render_report;
use crate::report::summary::ReportSummary;

pub mod layout;
pub mod summary;

#[derive(Deserialize, Debug)]
struct ReportPayload {
    #[serde(default)]
    restaurants: Vec<RestaurantSummary>,
}

#[instrument(skip(config), fields(output = %config.output.display()))]
pub async fn generate_report(config: &ReportConfig) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build the report HTTP client")?;

    let restaurants = fetch_restaurants(&client, &config.api_url).await;
    let summary = ReportSummary::from_restaurants(&restaurants);
    let bytes = render_report(&summary, config.logo.as_deref())?;

    tokio::fs::write(&config.output, bytes)
        .await
        .with_context(|| format!("Failed to write report to {}", config.output.display()))?;
    info!("PDF report generated at {}", config.output.display());

    Ok(())
}

/// Restaurants from the search API; an unreachable or failing API yields an empty list.
pub async fn fetch_restaurants(client: &reqwest::Client, api_url: &str) -> Vec<RestaurantSummary> {
    match try_fetch_restaurants(client, api_url).await {
        Ok(restaurants) => {
            info!("Fetched {} restaurants for the report", restaurants.len());
            restaurants
        }
        Err(e) => {
            warn!("Failed to fetch restaurant data due to: {:#}", e);
            Vec::new()
        }
    }
}

async fn try_fetch_restaurants(
    client: &reqwest::Client,
    api_url: &str,
) -> anyhow::Result<Vec<RestaurantSummary>> {
    let payload = client
        .get(api_url)
        .send()
        .await
        .context("Search API unreachable")?
        .error_for_status()
        .context("Search API returned an error status")?
        .json::<ReportPayload>()
        .await
        .context("Search API returned malformed JSON")?;

    Ok(payload.restaurants)
}
