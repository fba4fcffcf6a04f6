//! Weather Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use kotoba::DomainError;

use crate::models::ForecastResponse;
use crate::AppState;

/// Look up the forecast for a city
#[utoipa::path(
    get,
    path = "/weather/{city}",
    params(
        ("city" = String, Path, description = "City alias (台北, taichung...) or location name")
    ),
    responses(
        (status = 200, description = "Forecast", body = ForecastResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Weather lookup failed")
    ),
    tag = "Weather"
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<ForecastResponse>, (StatusCode, String)> {
    let forecast = state
        .conversation
        .forecast(&city)
        .await
        .map_err(|e| match e {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            other => {
                tracing::warn!(city = %city, error = %other, "Weather lookup failed");
                (StatusCode::BAD_GATEWAY, other.to_string())
            }
        })?;

    Ok(Json(ForecastResponse::from_domain(forecast)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/weather/:city", get(get_forecast))
}
