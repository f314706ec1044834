mod foodbanks;
mod inventory;
mod search;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use foodshed_core::types::Site;
use foodshed_core::validate::ValidationError;
use foodshed_inventory::InventoryStore;
use foodshed_search::SearchService;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub sites: Arc<Vec<Site>>,
    pub service: Arc<SearchService>,
    pub store: Arc<InventoryStore>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_options: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<&'static str>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    sites: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                valid_options: None,
                examples: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    /// Maps a validation failure to the 400 envelope, carrying the full
    /// vocabulary or example inputs when the error has them.
    pub fn from_validation(request_id: String, error: &ValidationError) -> Self {
        Self {
            error: ErrorBody {
                code: "validation_error".to_string(),
                message: error.to_string(),
                valid_options: error.valid_options(),
                examples: error.examples(),
            },
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Looks up a site by id, mapping a miss to the 404 envelope.
pub(super) fn find_site<'a>(
    state: &'a AppState,
    request_id: &str,
    site_id: &str,
) -> Result<&'a Site, ApiError> {
    state.sites.iter().find(|s| s.id == site_id).ok_or_else(|| {
        ApiError::new(
            request_id.to_string(),
            "not_found",
            format!("Food bank '{site_id}' not found"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search::search))
        .route("/api/search/suggestions", get(search::suggestions))
        .route("/api/search/nearby/{lat}/{lon}", get(search::nearby))
        .route("/api/foodbanks", get(foodbanks::list_sites))
        .route("/api/foodbanks/{id}", get(foodbanks::get_site))
        .route(
            "/api/inventory/{site_id}",
            get(inventory::list_inventory).post(inventory::add_item),
        )
        .route(
            "/api/inventory/{site_id}/{item_id}",
            put(inventory::set_quantity),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            sites: state.sites.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
