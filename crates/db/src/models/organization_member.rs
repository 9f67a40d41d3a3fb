//! Organization membership model and DTOs.

use std::fmt;

use budgetra_core::roles::{ROLE_ADMIN, ROLE_FINANCE_LEAD, ROLE_MEMBER};
use budgetra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role a member holds within one organization (PostgreSQL `org_role`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "org_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    FinanceLead,
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => ROLE_ADMIN,
            MemberRole::FinanceLead => ROLE_FINANCE_LEAD,
            MemberRole::Member => ROLE_MEMBER,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `organization_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationMember {
    pub id: DbId,
    pub organization_id: DbId,
    pub user_id: DbId,
    pub role: MemberRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a user to an organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganizationMember {
    #[serde(default)]
    pub id: Option<DbId>,
    pub organization_id: DbId,
    pub user_id: DbId,
    pub role: MemberRole,
}

/// DTO for updating a membership. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrganizationMember {
    pub organization_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub role: Option<MemberRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_match_core_constants() {
        assert_eq!(MemberRole::Admin.as_str(), "admin");
        assert_eq!(MemberRole::FinanceLead.as_str(), "finance_lead");
        assert_eq!(MemberRole::Member.to_string(), "member");
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&MemberRole::FinanceLead).unwrap();
        assert_eq!(json, "\"finance_lead\"");
        let role: MemberRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, MemberRole::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<MemberRole>("\"owner\"").is_err());
    }
}
