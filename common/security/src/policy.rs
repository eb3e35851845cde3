use crate::{roles::Role, SecurityContext, SecurityError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Borrow,
    ReturnOwn,
    ReturnAny,
    CatalogView,
    CatalogWrite,
    OverdueView,
    ReportView,
}

// Simple mapping: which roles are allowed each capability.
fn allowed_roles(cap: Capability) -> &'static [Role] {
    use Capability::*;
    use Role::*;
    match cap {
        Borrow => &[SuperAdmin, TenantAdmin, Member],
        ReturnOwn => &[SuperAdmin, TenantAdmin, Member],
        ReturnAny => &[SuperAdmin, TenantAdmin],
        CatalogView => &[SuperAdmin, TenantAdmin, Member],
        CatalogWrite => &[SuperAdmin, TenantAdmin],
        OverdueView => &[SuperAdmin, TenantAdmin],
        ReportView => &[SuperAdmin, TenantAdmin],
    }
}

pub fn ensure_capability(ctx: &SecurityContext, cap: Capability) -> Result<(), SecurityError> {
    let allowed = allowed_roles(cap);
    if ctx.roles.iter().any(|r| allowed.iter().any(|a| a == r)) { return Ok(()); }
    Err(SecurityError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TenantScope;
    use uuid::Uuid;

    fn mk_ctx(roles: Vec<Role>) -> SecurityContext {
        SecurityContext {
            tenant: TenantScope::Tenant(Uuid::new_v4()),
            member_id: Uuid::new_v4(),
            roles,
            trace_id: None,
        }
    }

    #[test]
    fn member_cannot_write_catalog() {
        let ctx = mk_ctx(vec![Role::Member]);
        assert!(ensure_capability(&ctx, Capability::CatalogWrite).is_err());
    }

    #[test]
    fn member_can_borrow_and_return_own() {
        let ctx = mk_ctx(vec![Role::Member]);
        assert!(ensure_capability(&ctx, Capability::Borrow).is_ok());
        assert!(ensure_capability(&ctx, Capability::ReturnOwn).is_ok());
        assert!(ensure_capability(&ctx, Capability::ReturnAny).is_err());
    }

    #[test]
    fn member_cannot_scan_overdue() {
        let ctx = mk_ctx(vec![Role::Member]);
        assert!(ensure_capability(&ctx, Capability::OverdueView).is_err());
    }

    #[test]
    fn tenant_admin_can_return_any() {
        let ctx = mk_ctx(vec![Role::TenantAdmin]);
        assert!(ensure_capability(&ctx, Capability::ReturnAny).is_ok());
        assert!(ensure_capability(&ctx, Capability::CatalogWrite).is_ok());
    }

    #[test]
    fn superadmin_has_all() {
        let ctx = mk_ctx(vec![Role::SuperAdmin]);
        for cap in [
            Capability::Borrow,
            Capability::ReturnOwn,
            Capability::ReturnAny,
            Capability::CatalogView,
            Capability::CatalogWrite,
            Capability::OverdueView,
            Capability::ReportView,
        ] {
            assert!(ensure_capability(&ctx, cap).is_ok(), "SuperAdmin missing {:?}", cap);
        }
    }

    #[test]
    fn unknown_role_has_nothing() {
        let ctx = mk_ctx(vec![Role::Unknown("support".into())]);
        assert!(ensure_capability(&ctx, Capability::Borrow).is_err());
        assert!(ensure_capability(&ctx, Capability::CatalogView).is_err());
    }
}
