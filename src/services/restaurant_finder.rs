use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use crate::helpers::geo::haversine_distance;
use crate::helpers::keywords::common_keywords;
use crate::models::google_places::{Location, NearbyPlace, PlaceDetails};
use crate::models::restaurant::{
    PriceRange, RestaurantSummary, ReviewBucket, SearchMeta, SearchResult, ServicesAvailable,
};
use crate::repositories::google_places_repo::PlacesApi;

pub const REVIEW_EXCERPT_LIMIT: usize = 3;
pub const POSITIVE_RATING: f64 = 4.0;
pub const NEGATIVE_RATING: f64 = 2.0;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("No location matched the address: {0}")]
    LocationNotFound(String),

    #[error("Places provider request failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

#[derive(Clone, Debug)]
pub struct FinderSettings {
    pub search_radius_meters: f64,
    pub max_results: usize,
    pub page_token_delay: Duration,
    pub promotion_keywords: Vec<String>,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            search_radius_meters: 10_000.0,
            max_results: 6,
            page_token_delay: Duration::from_secs(2),
            promotion_keywords: ["descuento", "promoción", "discount", "promotion"]
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
        }
    }
}

pub struct RestaurantFinder {
    places_api: Arc<dyn PlacesApi>,
    settings: FinderSettings,
}

impl RestaurantFinder {
    pub fn new(
        places_api: Arc<dyn PlacesApi>,
        settings: FinderSettings,
    ) -> Self {
        Self {
            places_api,
            settings,
        }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, address: &str) -> Result<SearchResult, FinderError> {
        let origin = self
            .places_api
            .find_place(address)
            .await?
            .ok_or_else(|| FinderError::LocationNotFound(address.to_string()))?
            .geometry
            .location;
        info!("Resolved address to {},{}", origin.lat, origin.lng);

        let mut restaurants: Vec<RestaurantSummary> = Vec::new();
        let mut page_token: Option<String> = None;

        'pages: loop {
            let page = self
                .places_api
                .nearby_search(origin, page_token.as_deref())
                .await?;
            debug!("Nearby search page returned {} places", page.results.len());

            for place in page.results {
                if restaurants.len() >= self.settings.max_results {
                    break 'pages;
                }

                let distance = haversine_distance(origin, place.geometry.location);
                if distance > self.settings.search_radius_meters {
                    continue;
                }

                let details = self.places_api.place_details(&place.place_id).await?;
                restaurants.push(self.summarize(&place, distance, details));
            }

            match page.next_page_token {
                Some(token) if restaurants.len() < self.settings.max_results => {
                    tokio::time::sleep(self.settings.page_token_delay).await;
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        restaurants.sort_by_key(|restaurant| restaurant.distance_meters);
        info!("Found {} restaurants near {}", restaurants.len(), address);

        Ok(SearchResult {
            meta: SearchMeta {
                timestamp: current_timestamp(),
                address: Some(address.to_string()),
                origin: Some(origin),
            },
            restaurants,
        })
    }

    fn summarize(
        &self,
        place: &NearbyPlace,
        distance: f64,
        details: PlaceDetails,
    ) -> RestaurantSummary {
        let reviews = &details.reviews;

        let positive: Vec<&str> = reviews
            .iter()
            .filter(|review| review.rating >= POSITIVE_RATING)
            .map(|review| review.text.as_str())
            .collect();
        let negative: Vec<&str> = reviews
            .iter()
            .filter(|review| review.rating <= NEGATIVE_RATING)
            .map(|review| review.text.as_str())
            .collect();

        let promotions = reviews
            .iter()
            .filter(|review| {
                let text = review.text.to_lowercase();
                self.settings
                    .promotion_keywords
                    .iter()
                    .any(|keyword| text.contains(&keyword.to_lowercase()))
            })
            .map(|review| review.text.clone())
            .collect();

        RestaurantSummary {
            name: details.name.clone(),
            address: details.formatted_address.clone(),
            coordinates: place.geometry.location,
            distance_meters: distance.round() as u64,
            rating: details.rating,
            total_reviews: reviews.len(),
            positive_reviews: bucket(&positive),
            negative_reviews: bucket(&negative),
            common_keywords: common_keywords(reviews.iter().map(|review| review.text.as_str())),
            category: details.types.first().cloned(),
            estimated_wait_time: details
                .current_opening_hours
                .as_ref()
                .and_then(|hours| hours.wait_times.clone()),
            // The provider has no dine-in/takeaway/delivery flags; meal-service flags stand in.
            services_available: ServicesAvailable {
                dine_in: details.serves_dinner.unwrap_or(false),
                takeaway: details.serves_lunch.unwrap_or(false),
                delivery: details.serves_breakfast.unwrap_or(false),
            },
            price_range: details
                .price_level
                .map(PriceRange::Level)
                .unwrap_or_default(),
            promotions_or_discounts: promotions,
            opening_hours: details
                .opening_hours
                .as_ref()
                .map(|hours| hours.weekday_text.clone())
                .unwrap_or_default(),
            website: details.website.clone(),
        }
    }
}

fn bucket(texts: &[&str]) -> ReviewBucket {
    ReviewBucket {
        count: texts.len(),
        reviews: texts
            .iter()
            .take(REVIEW_EXCERPT_LIMIT)
            .map(|text| text.to_string())
            .collect(),
    }
}

fn current_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use crate::models::google_places::{
        Candidate, CurrentOpeningHours, Geometry, NearbySearchResponse, OpeningHours, PlaceReview,
    };
    use crate::models::restaurant::UNKNOWN_PRICE_RANGE;
    use super::*;

    const ORIGIN: Location = Location { lat: 21.0, lng: -89.6 };

    /// Serves canned pages and records which calls were made.
    #[derive(Default)]
    struct FakePlaces {
        candidate: Option<Candidate>,
        pages: HashMap<Option<String>, NearbySearchResponse>,
        details: HashMap<String, PlaceDetails>,
        fail_details: bool,
        details_calls: Mutex<Vec<String>>,
        page_calls: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl PlacesApi for FakePlaces {
        async fn find_place(&self, _address: &str) -> anyhow::Result<Option<Candidate>> {
            Ok(self.candidate.clone())
        }

        async fn nearby_search(
            &self,
            _location: Location,
            page_token: Option<&str>,
        ) -> anyhow::Result<NearbySearchResponse> {
            let key = page_token.map(str::to_string);
            self.page_calls.lock().unwrap().push(key.clone());
            self.pages
                .get(&key)
                .cloned()
                .ok_or_else(|| anyhow!("unexpected page token {:?}", key))
        }

        async fn place_details(&self, place_id: &str) -> anyhow::Result<PlaceDetails> {
            if self.fail_details {
                return Err(anyhow!("OVER_QUERY_LIMIT"));
            }
            self.details_calls.lock().unwrap().push(place_id.to_string());
            Ok(self.details.get(place_id).cloned().unwrap_or_default())
        }
    }

    fn origin_candidate() -> Option<Candidate> {
        Some(Candidate {
            place_id: "origin".to_string(),
            geometry: Geometry { location: ORIGIN },
        })
    }

    /// A place `north_meters` due north of the origin.
    fn place(id: &str, north_meters: f64) -> NearbyPlace {
        let degrees = north_meters / 111_194.93;
        NearbyPlace {
            place_id: id.to_string(),
            name: Some(id.to_string()),
            geometry: Geometry {
                location: Location { lat: ORIGIN.lat + degrees, lng: ORIGIN.lng },
            },
        }
    }

    fn page(results: Vec<NearbyPlace>, next: Option<&str>) -> NearbySearchResponse {
        NearbySearchResponse {
            results,
            next_page_token: next.map(str::to_string),
            status: "OK".to_string(),
            error_message: None,
        }
    }

    fn review(rating: f64, text: &str) -> PlaceReview {
        PlaceReview {
            author_name: None,
            rating,
            text: text.to_string(),
        }
    }

    fn settings() -> FinderSettings {
        FinderSettings {
            page_token_delay: Duration::from_millis(0),
            ..FinderSettings::default()
        }
    }

    fn finder(places: FakePlaces) -> (Arc<FakePlaces>, RestaurantFinder) {
        let places = Arc::new(places);
        let finder = RestaurantFinder::new(places.clone(), settings());
        (places, finder)
    }

    #[tokio::test]
    async fn unknown_address_is_location_not_found() {
        let (_, finder) = finder(FakePlaces::default());

        let err = finder.search("nowhere").await.unwrap_err();
        assert!(matches!(err, FinderError::LocationNotFound(address) if address == "nowhere"));
    }

    #[tokio::test]
    async fn skips_places_outside_radius_and_sorts_by_distance() {
        let mut pages = HashMap::new();
        pages.insert(
            None,
            page(vec![place("mid", 900.0), place("far", 15_000.0), place("near", 100.0)], None),
        );
        let (places, finder) = finder(FakePlaces {
            candidate: origin_candidate(),
            pages,
            ..FakePlaces::default()
        });

        let result = finder.search("Merida").await.unwrap();
        let distances: Vec<u64> = result
            .restaurants
            .iter()
            .map(|restaurant| restaurant.distance_meters)
            .collect();
        assert_eq!(distances, vec![100, 900]);
        assert_eq!(*places.details_calls.lock().unwrap(), vec!["mid", "near"]);
        assert_eq!(result.meta.origin, Some(ORIGIN));
        assert_eq!(result.meta.timestamp.len(), "2024-01-01 12:00:00".len());
    }

    #[tokio::test]
    async fn follows_page_tokens_until_cap() {
        let mut pages = HashMap::new();
        pages.insert(
            None,
            page((0..4).map(|i| place(&format!("p1-{}", i), 100.0 * i as f64)).collect(), Some("t1")),
        );
        pages.insert(
            Some("t1".to_string()),
            page((0..4).map(|i| place(&format!("p2-{}", i), 500.0 + i as f64)).collect(), Some("t2")),
        );
        let (places, finder) = finder(FakePlaces {
            candidate: origin_candidate(),
            pages,
            ..FakePlaces::default()
        });

        let result = finder.search("Merida").await.unwrap();
        assert_eq!(result.restaurants.len(), 6);
        assert_eq!(places.details_calls.lock().unwrap().len(), 6);
        assert_eq!(*places.page_calls.lock().unwrap(), vec![None, Some("t1".to_string())]);
    }

    #[tokio::test]
    async fn stops_when_no_page_token() {
        let mut pages = HashMap::new();
        pages.insert(None, page(vec![place("only", 10.0)], None));
        let (places, finder) = finder(FakePlaces {
            candidate: origin_candidate(),
            pages,
            ..FakePlaces::default()
        });

        let result = finder.search("Merida").await.unwrap();
        assert_eq!(result.restaurants.len(), 1);
        assert_eq!(places.page_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn details_failure_is_upstream_error() {
        let mut pages = HashMap::new();
        pages.insert(None, page(vec![place("a", 10.0)], None));
        let (_, finder) = finder(FakePlaces {
            candidate: origin_candidate(),
            pages,
            fail_details: true,
            ..FakePlaces::default()
        });

        let err = finder.search("Merida").await.unwrap_err();
        assert!(matches!(err, FinderError::Upstream(_)));
        assert!(err.to_string().contains("OVER_QUERY_LIMIT"));
    }

    #[tokio::test]
    async fn enriches_record_from_reviews_and_details() {
        let details = PlaceDetails {
            name: Some("La Chaya Maya".to_string()),
            formatted_address: Some("Calle 62, Centro, Mérida".to_string()),
            rating: Some(4.5),
            reviews: vec![
                review(5.0, "Excelente comida yucateca, excelente servicio"),
                review(4.0, "Buena comida, hay descuento los martes"),
                review(5.0, "Excelente lugar"),
                review(4.0, "Muy buena comida"),
                review(1.0, "Servicio lento"),
                review(3.0, "Normal, con PROMOCIÓN de bebidas"),
            ],
            types: vec!["restaurant".to_string(), "food".to_string()],
            price_level: Some(2),
            opening_hours: Some(OpeningHours {
                weekday_text: vec!["Monday: 8:00 AM – 10:00 PM".to_string()],
            }),
            current_opening_hours: Some(CurrentOpeningHours { wait_times: None }),
            serves_dinner: Some(true),
            serves_lunch: Some(false),
            ..PlaceDetails::default()
        };
        let mut pages = HashMap::new();
        pages.insert(None, page(vec![place("chaya", 250.0)], None));
        let mut all_details = HashMap::new();
        all_details.insert("chaya".to_string(), details);
        let (_, finder) = finder(FakePlaces {
            candidate: origin_candidate(),
            pages,
            details: all_details,
            ..FakePlaces::default()
        });

        let result = finder.search("Merida").await.unwrap();
        let restaurant = &result.restaurants[0];

        assert_eq!(restaurant.name.as_deref(), Some("La Chaya Maya"));
        assert_eq!(restaurant.distance_meters, 250);
        assert_eq!(restaurant.total_reviews, 6);
        assert_eq!(restaurant.positive_reviews.count, 4);
        assert_eq!(restaurant.positive_reviews.reviews.len(), 3);
        assert_eq!(restaurant.negative_reviews.count, 1);
        assert_eq!(restaurant.negative_reviews.reviews, vec!["Servicio lento"]);
        assert_eq!(restaurant.category.as_deref(), Some("restaurant"));
        assert_eq!(restaurant.price_range, PriceRange::Level(2));
        assert_eq!(restaurant.promotions_or_discounts.len(), 2);
        assert!(restaurant.services_available.dine_in);
        assert!(!restaurant.services_available.takeaway);
        assert!(!restaurant.services_available.delivery);
        assert_eq!(restaurant.opening_hours.len(), 1);
        assert_eq!(restaurant.common_keywords[0], "excelente");
        assert!(restaurant.common_keywords.contains(&"comida".to_string()));
    }

    #[tokio::test]
    async fn missing_details_fall_back_to_placeholders() {
        let mut pages = HashMap::new();
        pages.insert(None, page(vec![place("bare", 50.0)], None));
        let (_, finder) = finder(FakePlaces {
            candidate: origin_candidate(),
            pages,
            ..FakePlaces::default()
        });

        let result = finder.search("Merida").await.unwrap();
        let restaurant = &result.restaurants[0];
        assert!(restaurant.name.is_none());
        assert!(restaurant.rating.is_none());
        assert!(restaurant.category.is_none());
        assert_eq!(restaurant.price_range, PriceRange::Label(UNKNOWN_PRICE_RANGE.to_string()));
        assert_eq!(restaurant.services_available, ServicesAvailable::default());
        assert!(restaurant.common_keywords.is_empty());

        let json = serde_json::to_value(restaurant).unwrap();
        assert_eq!(json["price_range"], "Unknown");
        assert_eq!(json["services_available"]["Dine-in"], false);
        assert!(json["website"].is_null());
    }
}
