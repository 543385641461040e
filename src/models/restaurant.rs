use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::google_places::Location;

pub const UNKNOWN_PRICE_RANGE: &str = "Unknown";

/// One enriched restaurant as returned by the search endpoint.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RestaurantSummary {
    pub name: Option<String>,
    pub address: Option<String>,
    pub coordinates: Location,
    pub distance_meters: u64,
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: usize,
    #[serde(default)]
    pub positive_reviews: ReviewBucket,
    #[serde(default)]
    pub negative_reviews: ReviewBucket,
    #[serde(default)]
    pub common_keywords: Vec<String>,
    pub category: Option<String>,
    pub estimated_wait_time: Option<Value>,
    #[serde(default)]
    pub services_available: ServicesAvailable,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub promotions_or_discounts: Vec<String>,
    #[serde(default)]
    pub opening_hours: Vec<String>,
    pub website: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct ReviewBucket {
    pub count: usize,
    pub reviews: Vec<String>,
}

#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct ServicesAvailable {
    #[serde(rename = "Dine-in")]
    pub dine_in: bool,
    #[serde(rename = "Takeaway")]
    pub takeaway: bool,
    #[serde(rename = "Delivery")]
    pub delivery: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum PriceRange {
    Level(u8),
    Label(String),
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::Label(UNKNOWN_PRICE_RANGE.to_string())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchMeta {
    pub timestamp: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub origin: Option<Location>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchResult {
    pub meta: SearchMeta,
    pub restaurants: Vec<RestaurantSummary>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
