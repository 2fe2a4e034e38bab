mod check;
mod stores;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use mtgprice_scraper::{Aggregator, CheckError, PriceLookup};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id;

pub struct AppState<L> {
    pub aggregator: Arc<Aggregator<L>>,
}

// Manual impl: `L` itself need not be `Clone`.
impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            aggregator: Arc::clone(&self.aggregator),
        }
    }
}

/// Error body shared by every endpoint: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<CheckError> for ApiError {
    fn from(error: CheckError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    stores_configured: usize,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app<L>(state: AppState<L>) -> Router
where
    L: PriceLookup + 'static,
{
    Router::new()
        .route("/api/health", get(health::<L>))
        .route("/api/stores", get(stores::list_stores::<L>))
        .route("/api/check-prices", post(check::check_prices::<L>))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health<L: PriceLookup + 'static>(State(state): State<AppState<L>>) -> impl IntoResponse {
    Json(HealthData {
        status: "healthy",
        stores_configured: state.aggregator.registry().len(),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
