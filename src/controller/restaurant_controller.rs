use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;
use crate::models::restaurant::ErrorBody;
use crate::services::restaurant_finder::{FinderError, RestaurantFinder};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/buscar_restaurantes", get(search_nearby_restaurants))
        .route("/restaurants/nearby", get(search_nearby_restaurants))
        .route_layer(Extension(app_state.restaurant_finder))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchRestaurantParam {
    #[serde(alias = "direccion")]
    pub address: Option<String>,
}

pub async fn search_nearby_restaurants(
    Extension(restaurant_finder): Extension<Arc<RestaurantFinder>>,
    query: Result<Query<SearchRestaurantParam>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => {
            warn!("Rejected restaurant search query: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.body_text());
        }
    };

    let address = match query.address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => address,
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "An address must be provided");
        }
    };

    return match restaurant_finder.search(address).await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
                body,
            ).into_response(),
            Err(e) => {
                warn!("Failed to serialize search result due to: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize search result")
            }
        },
        Err(e @ FinderError::LocationNotFound(_)) => {
            warn!("Search for restaurants found no location: {}", e);
            error_response(StatusCode::NOT_FOUND, "The specified location could not be found")
        }
        Err(e @ FinderError::Upstream(_)) => {
            warn!("Something went wrong searching for restaurants due to: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    };
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
