use axum::extract::{Path, State};
use axum::Json;
use common_http_errors::{ApiError, ApiResult};
use common_security::{ensure_capability, Capability, SecurityCtxExtractor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::ledger::{self, ItemRecord};
use crate::loan_handlers::map_ledger_error;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub author: Option<String>,
    pub external_code: Option<String>,
    pub total_copies: i32,
}

#[derive(Debug, Deserialize)]
pub struct ResizeCopiesRequest {
    pub total_copies: i32,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub external_code: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub status: &'static str,
}

impl From<ItemRecord> for ItemResponse {
    fn from(item: ItemRecord) -> Self {
        let status = item.availability();
        ItemResponse {
            id: item.id,
            tenant_id: item.tenant_id,
            title: item.title,
            author: item.author,
            external_code: item.external_code,
            total_copies: item.total_copies,
            available_copies: item.available_copies,
            status,
        }
    }
}

pub async fn create_item(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    Json(payload): Json<CreateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    ensure_capability(&sec, Capability::CatalogWrite)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "tenant_admin", trace_id: sec.trace_id })?;
    let tenant_id = sec
        .tenant
        .require_tenant()
        .map_err(|e| e.into_api(sec.trace_id))?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("missing_title", sec.trace_id));
    }

    let item = ledger::create_item(
        &state.db,
        tenant_id,
        title,
        payload.author.as_deref(),
        payload.external_code.as_deref(),
        payload.total_copies,
    )
    .await
    .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    tracing::info!(tenant_id = %tenant_id, item_id = %item.id, copies = item.total_copies, "item created");
    Ok(Json(item.into()))
}

pub async fn resize_copies(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ResizeCopiesRequest>,
) -> ApiResult<Json<ItemResponse>> {
    ensure_capability(&sec, Capability::CatalogWrite)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "tenant_admin", trace_id: sec.trace_id })?;
    let tenant_id = sec
        .tenant
        .require_tenant()
        .map_err(|e| e.into_api(sec.trace_id))?;

    let item = ledger::resize_item_copies(&state.db, tenant_id, item_id, payload.total_copies)
        .await
        .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    tracing::info!(tenant_id = %tenant_id, item_id = %item.id, copies = item.total_copies, "item copies resized");
    Ok(Json(item.into()))
}

pub async fn list_items(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
) -> ApiResult<Json<Vec<ItemResponse>>> {
    ensure_capability(&sec, Capability::CatalogView)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "member", trace_id: sec.trace_id })?;
    let tenant_id = sec
        .tenant
        .require_tenant()
        .map_err(|e| e.into_api(sec.trace_id))?;

    let items = ledger::list_items(&state.db, tenant_id)
        .await
        .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}
