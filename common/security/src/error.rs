use common_http_errors::ApiError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("missing tenant identifier")]    MissingTenant,
    #[error("invalid tenant identifier")]    InvalidTenant,
    #[error("missing member identifier")]    MissingMember,
    #[error("invalid member identifier")]    InvalidMember,
    #[error("global scope requires an explicit tenant")] TenantScopeRequired,
    #[error("unauthorized - missing required role")]    Forbidden,
}

impl SecurityError {
    pub fn into_api(self, trace_id: Option<Uuid>) -> ApiError {
        match self {
            SecurityError::MissingTenant => ApiError::BadRequest {
                code: "missing_tenant_id",
                trace_id,
                message: Some("Missing X-Tenant-ID header".into()),
            },
            SecurityError::InvalidTenant => ApiError::bad_request("invalid_tenant_id", trace_id),
            SecurityError::MissingMember => ApiError::BadRequest {
                code: "missing_member_id",
                trace_id,
                message: Some("Missing X-Member-ID header".into()),
            },
            SecurityError::InvalidMember => ApiError::bad_request("invalid_member_id", trace_id),
            SecurityError::TenantScopeRequired => {
                ApiError::bad_request("tenant_scope_required", trace_id)
            }
            SecurityError::Forbidden => ApiError::Forbidden { trace_id },
        }
    }
}
