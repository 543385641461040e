use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnNull};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
pub const STATUS_INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const STATUS_REQUEST_DENIED: &str = "REQUEST_DENIED";
pub const STATUS_OVER_QUERY_LIMIT: &str = "OVER_QUERY_LIMIT";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FindPlaceResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Candidate {
    pub place_id: String,
    pub geometry: Geometry,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
    pub next_page_token: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NearbyPlace {
    pub place_id: String,
    pub name: Option<String>,
    pub geometry: Geometry,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceDetailsResponse {
    pub result: Option<PlaceDetails>,
    pub status: String,
    pub error_message: Option<String>,
}

#[serde_as]
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub types: Vec<String>,
    pub price_level: Option<u8>,
    pub website: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    pub current_opening_hours: Option<CurrentOpeningHours>,
    pub serves_beer: Option<bool>,
    pub serves_breakfast: Option<bool>,
    pub serves_lunch: Option<bool>,
    pub serves_dinner: Option<bool>,
}

#[serde_as]
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct PlaceReview {
    pub author_name: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub rating: f64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub text: String,
}

#[serde_as]
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct OpeningHours {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct CurrentOpeningHours {
    pub wait_times: Option<Value>,
}
