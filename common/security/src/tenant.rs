//! Tenant isolation decisions.
//!
//! A tenant-scoped actor may touch only rows of its own tenant; a global
//! actor may read anything. Callers outside the owning tenant must not be
//! able to distinguish "denied" from "absent", so storage lookups are
//! expected to filter by the actor's tenant and report misses as not-found.
//! These helpers cover the cases where a row has already been fetched (e.g.
//! by a global actor) and a second record's tenant must line up.

use uuid::Uuid;

use crate::context::TenantScope;

pub fn can_access_tenant(scope: &TenantScope, record_tenant: Uuid) -> bool {
    match scope {
        TenantScope::Global => true,
        TenantScope::Tenant(id) => *id == record_tenant,
    }
}
