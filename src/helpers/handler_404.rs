use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crate::models::restaurant::ErrorBody;

pub async fn page_not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Oops looks like you landed at the wrong endpoint")),
    )
}
