use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use common_http_errors::{ApiError, ApiResult};
use common_observability::CirculationMetrics;
use common_security::{ensure_any_role, ensure_capability, Capability, Role, SecurityCtxExtractor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::ledger::{self, LedgerError, LoanRecord};

#[derive(Debug, Deserialize)]
pub struct BorrowRequest {
    pub item_id: Uuid,
    /// Defaults to now + 14 days when omitted. Must be strictly in the
    /// future; the period itself is the caller's choice.
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct LoanListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActiveLoanCountResponse {
    pub member_id: Uuid,
    pub active_loans: i64,
}

pub(crate) fn map_ledger_error(
    err: LedgerError,
    trace_id: Option<Uuid>,
    metrics: &CirculationMetrics,
) -> ApiError {
    match err {
        LedgerError::ItemNotFound => ApiError::not_found("item_not_found", trace_id),
        LedgerError::LoanNotFound => ApiError::not_found("loan_not_found", trace_id),
        LedgerError::MemberNotFound => ApiError::not_found("member_not_found", trace_id),
        LedgerError::NoCopiesAvailable => {
            metrics.borrow_conflicts_total.with_label_values(&["no_copies_available"]).inc();
            ApiError::conflict("no_copies_available", trace_id)
        }
        LedgerError::LoanLimitReached => {
            metrics.borrow_conflicts_total.with_label_values(&["loan_limit_reached"]).inc();
            ApiError::conflict("loan_limit_reached", trace_id)
        }
        LedgerError::AlreadyReturned => {
            metrics.borrow_conflicts_total.with_label_values(&["already_returned"]).inc();
            ApiError::conflict("already_returned", trace_id)
        }
        LedgerError::CopiesOnLoan => ApiError::conflict("copies_on_loan", trace_id),
        LedgerError::DueDateNotFuture => ApiError::bad_request("due_date_not_future", trace_id),
        LedgerError::InvalidTotalCopies => ApiError::bad_request("invalid_total_copies", trace_id),
        LedgerError::NotLoanHolder => ApiError::Forbidden { trace_id },
        LedgerError::InventoryOverflow { item_id } => {
            metrics.inventory_overflow_total.inc();
            tracing::error!(item_id = %item_id, "return would push available copies past the total");
            ApiError::internal(trace_id)
        }
        LedgerError::Db(err) => {
            tracing::error!(error = %err, "database error");
            ApiError::internal(trace_id)
        }
    }
}

pub async fn borrow_item(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    Json(payload): Json<BorrowRequest>,
) -> ApiResult<Json<LoanRecord>> {
    ensure_capability(&sec, Capability::Borrow)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "member", trace_id: sec.trace_id })?;
    let tenant_id = sec
        .tenant
        .require_tenant()
        .map_err(|e| e.into_api(sec.trace_id))?;

    let due_date = payload
        .due_date
        .unwrap_or_else(|| Utc::now() + Duration::days(state.loan_period_days));

    let loan = ledger::borrow_copy(
        &state.db,
        tenant_id,
        sec.member_id,
        payload.item_id,
        due_date,
        state.loan_limit,
    )
    .await
    .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    tracing::info!(
        tenant_id = %tenant_id,
        member_id = %sec.member_id,
        item_id = %payload.item_id,
        loan_id = %loan.id,
        "loan created"
    );
    Ok(Json(loan))
}

pub async fn return_loan(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    Path(loan_id): Path<Uuid>,
) -> ApiResult<Json<LoanRecord>> {
    ensure_capability(&sec, Capability::ReturnOwn)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "member", trace_id: sec.trace_id })?;

    let loan = ledger::return_copy(
        &state.db,
        &sec.tenant,
        sec.member_id,
        sec.is_admin(),
        loan_id,
    )
    .await
    .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    tracing::info!(tenant_id = %loan.tenant_id, loan_id = %loan.id, "loan returned");
    Ok(Json(loan))
}

pub async fn list_overdue(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
) -> ApiResult<Json<Vec<LoanRecord>>> {
    ensure_capability(&sec, Capability::OverdueView)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "tenant_admin", trace_id: sec.trace_id })?;

    let timer = state.metrics.overdue_scan_duration_seconds.start_timer();
    let loans = ledger::list_overdue(&state.db, sec.tenant.tenant_id())
        .await
        .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;
    timer.observe_duration();

    Ok(Json(loans))
}

pub async fn active_loan_count(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<ActiveLoanCountResponse>> {
    // Members may ask about themselves; anyone else needs a reporting role.
    if member_id != sec.member_id {
        ensure_any_role(&sec, &[Role::TenantAdmin, Role::SuperAdmin])
            .map_err(|_| ApiError::Forbidden { trace_id: sec.trace_id })?;
    }
    let tenant_id = sec
        .tenant
        .require_tenant()
        .map_err(|e| e.into_api(sec.trace_id))?;

    let active_loans = ledger::active_loan_count(&state.db, tenant_id, member_id)
        .await
        .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    Ok(Json(ActiveLoanCountResponse { member_id, active_loans }))
}

pub async fn list_loans(
    State(state): State<AppState>,
    SecurityCtxExtractor(sec): SecurityCtxExtractor,
    Query(query): Query<LoanListQuery>,
) -> ApiResult<Json<Vec<LoanRecord>>> {
    ensure_capability(&sec, Capability::ReportView)
        .map_err(|_| ApiError::ForbiddenMissingRole { role: "tenant_admin", trace_id: sec.trace_id })?;
    let tenant_id = sec
        .tenant
        .require_tenant()
        .map_err(|e| e.into_api(sec.trace_id))?;

    let status = match query.status.as_deref() {
        None => None,
        Some(s @ ("active" | "returned")) => Some(s),
        Some(_) => return Err(ApiError::bad_request("invalid_status_filter", sec.trace_id)),
    };

    let loans = ledger::list_loans(&state.db, tenant_id, status)
        .await
        .map_err(|e| map_ledger_error(e, sec.trace_id, &state.metrics))?;

    Ok(Json(loans))
}
