use std::time::Duration;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use crate::models::google_places::{
    FindPlaceResponse, Location, NearbySearchResponse, PlaceDetails, PlaceDetailsResponse,
    Candidate, STATUS_INVALID_REQUEST, STATUS_OK, STATUS_OVER_QUERY_LIMIT,
    STATUS_REQUEST_DENIED, STATUS_ZERO_RESULTS,
};

pub const RETRY_LIMIT: usize = 5;

pub const DETAILS_FIELDS: &str = "name,rating,formatted_address,reviews,opening_hours,website,\
price_level,types,user_ratings_total,current_opening_hours,serves_beer,serves_breakfast,\
serves_lunch,serves_dinner";

/// The three place-search calls a restaurant search is built from.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Resolve free text to the best matching place, if any.
    async fn find_place(&self, address: &str) -> anyhow::Result<Option<Candidate>>;

    /// Restaurants around `location`, nearest first.
    async fn nearby_search(
        &self,
        location: Location,
        page_token: Option<&str>,
    ) -> anyhow::Result<NearbySearchResponse>;

    async fn place_details(&self, place_id: &str) -> anyhow::Result<PlaceDetails>;
}

pub struct GooglePlacesRepo {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_token_delay: Duration,
}

impl GooglePlacesRepo {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        page_token_delay: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_token_delay,
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/json", self.base_url, endpoint)
    }

    async fn make_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        debug!("Calling places endpoint: {}", endpoint);
        self.client
            .get(self.endpoint_url(endpoint))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to reach places endpoint {}", endpoint))?
            .error_for_status()
            .with_context(|| format!("Places endpoint {} returned an error status", endpoint))?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from places endpoint {}", endpoint))
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesRepo {
    async fn find_place(&self, address: &str) -> anyhow::Result<Option<Candidate>> {
        let response: FindPlaceResponse = self
            .make_request(
                "findplacefromtext",
                &[
                    ("input", address),
                    ("inputtype", "textquery"),
                    ("fields", "place_id,geometry"),
                ],
            )
            .await?;
        check_status("findplacefromtext", &response.status, response.error_message.as_deref())?;

        Ok(response.candidates.into_iter().next())
    }

    async fn nearby_search(
        &self,
        location: Location,
        page_token: Option<&str>,
    ) -> anyhow::Result<NearbySearchResponse> {
        let location = format!("{},{}", location.lat, location.lng);
        let mut params = vec![
            ("location", location.as_str()),
            ("type", "restaurant"),
            ("rankby", "distance"),
        ];
        if let Some(token) = page_token {
            params.push(("pagetoken", token));
        }

        for attempt in 1..=RETRY_LIMIT {
            let response: NearbySearchResponse = self.make_request("nearbysearch", &params).await?;

            // Continuation tokens only become valid a short while after being issued.
            if page_token.is_some() && response.status == STATUS_INVALID_REQUEST {
                if attempt == RETRY_LIMIT {
                    break;
                }
                warn!(
                    "Page token not ready yet (attempt {}/{}), retrying in {:?}",
                    attempt, RETRY_LIMIT, self.page_token_delay
                );
                tokio::time::sleep(self.page_token_delay).await;
                continue;
            }

            check_status("nearbysearch", &response.status, response.error_message.as_deref())?;
            return Ok(response);
        }

        Err(anyhow!("Nearby search page token was never accepted, BAILING"))
    }

    async fn place_details(&self, place_id: &str) -> anyhow::Result<PlaceDetails> {
        let response: PlaceDetailsResponse = self
            .make_request(
                "details",
                &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
            )
            .await?;

        match (response.status.as_str(), response.result) {
            (status @ (STATUS_REQUEST_DENIED | STATUS_OVER_QUERY_LIMIT), _) => {
                Err(status_error("details", status, response.error_message.as_deref()))
            }
            (_, Some(result)) => Ok(result),
            (status, None) => {
                // Stale place ids answer NOT_FOUND; the place still gets a placeholder record.
                warn!(
                    "Details for place {} came back {} without a result, using placeholders",
                    place_id, status
                );
                Ok(PlaceDetails::default())
            }
        }
    }
}

fn check_status(endpoint: &str, status: &str, error_message: Option<&str>) -> anyhow::Result<()> {
    match status {
        STATUS_OK | STATUS_ZERO_RESULTS => Ok(()),
        other => Err(status_error(endpoint, other, error_message)),
    }
}

fn status_error(endpoint: &str, status: &str, error_message: Option<&str>) -> anyhow::Error {
    anyhow!(
        "Places endpoint {} answered {}: {}",
        endpoint,
        status,
        error_message.unwrap_or("no error message")
    )
}
