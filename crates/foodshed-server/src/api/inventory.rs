use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use foodshed_catalog::EnrichedItem;
use foodshed_core::types::{Category, InventoryItem};
use foodshed_search::InventoryQuery;

use crate::middleware::RequestId;

use super::{find_site, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct InventoryListQuery {
    /// Comma-separated allergen-free requirements, e.g. `dairy-free`.
    allergens: Option<String>,
    category: Option<String>,
    /// Catalog enhancement toggle; anything except `false` enables it.
    enhanced: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct QuantityBody {
    quantity: u32,
}

pub(super) async fn list_inventory(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(site_id): Path<String>,
    Query(query): Query<InventoryListQuery>,
) -> Result<Json<ApiResponse<Vec<EnrichedItem>>>, ApiError> {
    find_site(&state, &req_id.0, &site_id)?;

    let category = match query.category.as_deref() {
        Some(raw) => Some(Category::from_str(raw).map_err(|message| {
            ApiError::new(req_id.0.clone(), "bad_request", message)
        })?),
        None => None,
    };

    let inventory_query = InventoryQuery {
        allergens: query
            .allergens
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
        category,
        enhanced: query.enhanced.as_deref() != Some("false"),
    };

    let items = state.service.inventory(&site_id, &inventory_query).await;
    Ok(Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn add_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(site_id): Path<String>,
    Json(item): Json<InventoryItem>,
) -> Result<(StatusCode, Json<ApiResponse<InventoryItem>>), ApiError> {
    find_site(&state, &req_id.0, &site_id)?;

    let added = state.store.add_item(&site_id, item);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: added,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn set_quantity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((site_id, item_id)): Path<(String, String)>,
    Json(body): Json<QuantityBody>,
) -> Result<Json<ApiResponse<InventoryItem>>, ApiError> {
    let updated = state
        .store
        .set_quantity(&site_id, &item_id, body.quantity)
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("Inventory item '{item_id}' not found at '{site_id}'"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: updated,
        meta: ResponseMeta::new(req_id.0),
    }))
}
