//! # REST API
//!
//! Thin command handlers over the domain services: validate input, call one
//! operation, render the result or the error.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{
    CalculateRequest, CalculationListResponse, ErrorResponse, ExportRequest, WeatherRequest,
};
use tracing::{info, warn};

use crate::domain::DeskError;
use crate::AppState;

/// HTTP status for each error category
pub fn status_for(error: &DeskError) -> StatusCode {
    match error {
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        DeskError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Services log their own failures; this only records the response sent
fn error_response(error: DeskError) -> Response {
    let status = status_for(&error);
    warn!("Request failed with {}: {}", status, error);
    let body = ErrorResponse {
        error: error.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Axum handler function for POST /api/calculations
pub async fn create_calculation(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Response {
    info!("POST /api/calculations - request: {:?}", request);

    match state
        .calculation_service
        .calculate(request.a, &request.op, request.b)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/calculations
pub async fn list_calculations(State(state): State<AppState>) -> Response {
    info!("GET /api/calculations");

    match state.calculation_service.history().await {
        Ok(calculations) => {
            (StatusCode::OK, Json(CalculationListResponse { calculations })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/export
pub async fn export_calculations(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Response {
    info!("POST /api/export - path: {:?}", request.path);

    let destination = state.export_service.resolve_destination(request.path.as_deref());
    match state
        .export_service
        .export_to_csv(state.store.as_ref(), &destination)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/weather
pub async fn report_weather(
    State(state): State<AppState>,
    Json(request): Json<WeatherRequest>,
) -> Response {
    info!("POST /api/weather - city: {}", request.city);

    match state.weather_report_service.report_weather(&request.city).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}
