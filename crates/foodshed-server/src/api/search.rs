use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use foodshed_geo::LocationSuggestions;
use foodshed_search::{CoordinatesResponse, SearchError, SearchParams, SearchResponse};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    location: Option<String>,
    radius: Option<String>,
    /// Comma-separated allergen filters, e.g. `dairy-free,nut-free`.
    allergens: Option<String>,
    /// Comma-separated cultural filters.
    cultural: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RadiusQuery {
    radius: Option<String>,
}

fn split_csv(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (!values.is_empty()).then_some(values)
}

fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    let SearchError::Validation(validation) = error;
    ApiError::from_validation(request_id, validation)
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let params = SearchParams {
        location: query.location,
        radius: query.radius,
        allergens: split_csv(query.allergens.as_deref()),
        cultural: split_csv(query.cultural.as_deref()),
    };

    let response = state
        .service
        .search(&params, &state.sites)
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: response,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((lat, lon)): Path<(String, String)>,
    Query(query): Query<RadiusQuery>,
) -> Result<Json<ApiResponse<CoordinatesResponse>>, ApiError> {
    let response = state
        .service
        .search_by_coordinates(&lat, &lon, query.radius.as_deref(), &state.sites)
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: response,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn suggestions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<LocationSuggestions>> {
    Json(ApiResponse {
        data: state.service.location_suggestions(),
        meta: ResponseMeta::new(req_id.0),
    })
}
