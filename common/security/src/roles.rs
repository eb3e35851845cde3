use crate::context::SecurityContext;
use crate::SecurityError;
use tracing::warn;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    TenantAdmin,
    Member,
    Unknown(String),
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s {
            "super_admin" | "SuperAdmin" => Role::SuperAdmin,
            "tenant_admin" | "admin" | "TenantAdmin" => Role::TenantAdmin,
            "member" | "Member" => Role::Member,
            other => Role::Unknown(other.to_string()),
        }
    }

    /// Roles that may act on records they do not own within their tenant.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::TenantAdmin)
    }
}

pub fn ensure_any_role(ctx: &SecurityContext, required: &[Role]) -> Result<(), SecurityError> {
    if ctx.roles.iter().any(|r| required.iter().any(|x| x == r)) { return Ok(()); }
    warn!(tenant = %ctx.tenant, ?required, roles = ?ctx.roles, "any_role_check_failed");
    Err(SecurityError::Forbidden)
}
