//! Weather Route
//!
//! - GET /api/v1/weather?lat=&lon= - Current condition at a location
//!
//! Not owner-scoped, so it sits outside the auth layer.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{WeatherParams, WeatherResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiQuery;
use crate::api::state::AppState;
use crate::diary::validation::check_coordinates;
use crate::diary::ValidationErrors;

/// GET /api/v1/weather
pub async fn current_weather(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<WeatherParams>,
) -> ApiResult<Json<WeatherResponse>> {
    validate_coordinates(&params)?;

    let provider = state
        .weather
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Weather lookup is disabled".to_string()))?;

    let condition = provider.classify(params.lat, params.lon).await;

    Ok(Json(WeatherResponse {
        lat: params.lat,
        lon: params.lon,
        condition,
    }))
}

fn validate_coordinates(params: &WeatherParams) -> ApiResult<()> {
    let mut errors = ValidationErrors::new();
    check_coordinates(Some(params.lat), Some(params.lon), &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}
