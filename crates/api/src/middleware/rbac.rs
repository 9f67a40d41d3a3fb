//! Organization-scoped role checks.
//!
//! Roles are per organization, so they cannot be decided from the identity
//! alone. Handlers call [`OrgAccess::load`] with the organization id from the
//! path and then ask for the capability they need.

use budgetra_core::error::CoreError;
use budgetra_core::roles::{can_manage_budgets, can_manage_organization};
use budgetra_core::types::DbId;
use budgetra_db::models::organization::Organization;
use budgetra_db::models::organization_member::OrganizationMember;
use budgetra_db::repositories::{OrganizationMemberRepo, OrganizationRepo};
use budgetra_db::DbPool;

use super::auth::CurrentUser;
use crate::error::{AppError, AppResult};

/// The caller's membership in one organization.
#[derive(Debug)]
pub struct OrgAccess {
    pub organization: Organization,
    pub membership: OrganizationMember,
}

impl OrgAccess {
    /// Resolve the caller's membership in `organization_id`.
    ///
    /// Unknown organizations are 404; organizations the caller does not
    /// belong to are 403.
    pub async fn load(pool: &DbPool, organization_id: DbId, user: &CurrentUser) -> AppResult<Self> {
        let organization = OrganizationRepo::find_by_id(pool, organization_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Organization",
                id: organization_id,
            }))?;

        let membership = OrganizationMemberRepo::find_membership(pool, organization_id, user.id())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden(
                    "Not a member of this organization".into(),
                ))
            })?;

        Ok(Self {
            organization,
            membership,
        })
    }

    /// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
    pub fn require_admin(self) -> AppResult<Self> {
        if !can_manage_organization(self.membership.role.as_str()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(self)
    }

    /// Requires `finance_lead` or `admin`. Rejects with 403 Forbidden otherwise.
    pub fn require_budget_manager(self) -> AppResult<Self> {
        if !can_manage_budgets(self.membership.role.as_str()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Finance lead or Admin role required".into(),
            )));
        }
        Ok(self)
    }

    pub fn organization_id(&self) -> DbId {
        self.organization.id
    }
}
