use axum::{
    extract::{Path, State},
    Extension, Json,
};

use foodshed_search::SiteResult;

use crate::middleware::RequestId;

use super::{find_site, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_sites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<SiteResult>>> {
    Json(ApiResponse {
        data: state.service.list_sites(&state.sites),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn get_site(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SiteResult>>, ApiError> {
    let site = find_site(&state, &req_id.0, &id)?;
    Ok(Json(ApiResponse {
        data: state.service.site_detail(site),
        meta: ResponseMeta::new(req_id.0),
    }))
}
