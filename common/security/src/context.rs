use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use common_http_errors::ApiError;
use serde::{Deserialize, Serialize};
use tracing::Span;
use uuid::Uuid;

use crate::roles::Role;
use crate::SecurityError;

/// Which tenant an actor is operating as. `Global` is reserved for
/// super-administrators managing the platform without a tenant of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantScope {
    Tenant(Uuid),
    Global,
}

impl TenantScope {
    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            TenantScope::Tenant(id) => Some(*id),
            TenantScope::Global => None,
        }
    }

    /// Child records (loans, items) always belong to a concrete tenant.
    pub fn require_tenant(&self) -> Result<Uuid, SecurityError> {
        self.tenant_id().ok_or(SecurityError::TenantScopeRequired)
    }
}

impl std::fmt::Display for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenantScope::Tenant(id) => write!(f, "{id}"),
            TenantScope::Global => f.write_str("global"),
        }
    }
}

/// Verified actor identity, as established by the gateway/authorization
/// layer and forwarded through trusted headers. This service never inspects
/// credentials itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    pub tenant: TenantScope,
    pub member_id: Uuid,
    pub roles: Vec<Role>,
    pub trace_id: Option<Uuid>,
}

impl SecurityContext {
    /// Convenience helper for ownership overrides.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }
}

pub struct SecurityCtxExtractor(pub SecurityContext);

fn tenant_from_headers(headers: &HeaderMap) -> Result<Option<Uuid>, SecurityError> {
    match headers.get("X-Tenant-ID") {
        None => Ok(None),
        Some(v) => {
            let raw = v.to_str().map_err(|_| SecurityError::InvalidTenant)?.trim();
            if raw.is_empty() {
                return Err(SecurityError::InvalidTenant);
            }
            Uuid::parse_str(raw)
                .map(Some)
                .map_err(|_| SecurityError::InvalidTenant)
        }
    }
}

fn member_from_headers(headers: &HeaderMap) -> Result<Uuid, SecurityError> {
    let raw = headers
        .get("X-Member-ID")
        .ok_or(SecurityError::MissingMember)?
        .to_str()
        .map_err(|_| SecurityError::InvalidMember)?;
    Uuid::parse_str(raw.trim()).map_err(|_| SecurityError::InvalidMember)
}

fn roles_from_headers(headers: &HeaderMap) -> Vec<Role> {
    headers
        .get("X-Roles")
        .and_then(|v| v.to_str().ok())
        .map(|csv| {
            csv.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(Role::parse)
                .collect()
        })
        .unwrap_or_default()
}

fn trace_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("X-Trace-ID")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for SecurityCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let trace_id = trace_id_from_headers(headers).or_else(|| Some(Uuid::new_v4()));

        let roles = roles_from_headers(headers);
        let member_id = member_from_headers(headers).map_err(|e| e.into_api(trace_id))?;

        let tenant = match tenant_from_headers(headers).map_err(|e| e.into_api(trace_id))? {
            Some(id) => TenantScope::Tenant(id),
            // Only platform operators act without a tenant of their own.
            None if roles.contains(&Role::SuperAdmin) => TenantScope::Global,
            None => return Err(SecurityError::MissingTenant.into_api(trace_id)),
        };

        Span::current().record("tenant", tracing::field::display(tenant));
        if let Some(tid) = trace_id.as_ref() {
            Span::current().record("trace_id", tracing::field::display(tid));
        }

        Ok(SecurityCtxExtractor(SecurityContext {
            tenant,
            member_id,
            roles,
            trace_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(
                axum::http::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        h
    }

    #[test]
    fn tenant_header_parses() {
        let id = Uuid::new_v4();
        let h = headers(&[("X-Tenant-ID", &id.to_string())]);
        assert_eq!(tenant_from_headers(&h).unwrap(), Some(id));
    }

    #[test]
    fn malformed_tenant_header_rejected() {
        let h = headers(&[("X-Tenant-ID", "not-a-uuid")]);
        assert!(matches!(
            tenant_from_headers(&h),
            Err(SecurityError::InvalidTenant)
        ));
    }

    #[test]
    fn missing_member_header_rejected() {
        let h = HeaderMap::new();
        assert!(matches!(
            member_from_headers(&h),
            Err(SecurityError::MissingMember)
        ));
    }

    #[test]
    fn roles_csv_parsed_and_trimmed() {
        let h = headers(&[("X-Roles", "member, tenant_admin")]);
        assert_eq!(
            roles_from_headers(&h),
            vec![Role::Member, Role::TenantAdmin]
        );
    }

    #[test]
    fn require_tenant_rejects_global() {
        assert!(TenantScope::Global.require_tenant().is_err());
        let id = Uuid::new_v4();
        assert_eq!(TenantScope::Tenant(id).require_tenant().unwrap(), id);
    }
}
