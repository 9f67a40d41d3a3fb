//! Organization role names and the permissions they carry.
//!
//! These must match the labels of the `org_role` enum created in
//! `20260101000001_create_org_role_enum.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FINANCE_LEAD: &str = "finance_lead";
pub const ROLE_MEMBER: &str = "member";

/// Whether `role` may rename or delete the organization and manage its members.
pub fn can_manage_organization(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Whether `role` may create, edit or delete budgets.
pub fn can_manage_budgets(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_FINANCE_LEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_manages_organization() {
        assert!(can_manage_organization(ROLE_ADMIN));
        assert!(!can_manage_organization(ROLE_FINANCE_LEAD));
        assert!(!can_manage_organization(ROLE_MEMBER));
    }

    #[test]
    fn finance_lead_manages_budgets() {
        assert!(can_manage_budgets(ROLE_ADMIN));
        assert!(can_manage_budgets(ROLE_FINANCE_LEAD));
        assert!(!can_manage_budgets(ROLE_MEMBER));
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        assert!(!can_manage_organization("owner"));
        assert!(!can_manage_budgets(""));
    }
}
