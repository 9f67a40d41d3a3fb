//! Repository for the `organization_members` table.

use budgetra_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization_member::{
    CreateOrganizationMember, MemberRole, OrganizationMember, UpdateOrganizationMember,
};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, organization_id, user_id, role, created_at, updated_at";

/// Provides CRUD operations for organization memberships.
pub struct OrganizationMemberRepo;

impl OrganizationMemberRepo {
    /// Insert a new membership, returning the created row.
    ///
    /// Fails with a `uq_organization_members_org_user` violation if the user
    /// already belongs to the organization.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganizationMember,
    ) -> Result<OrganizationMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO organization_members (id, organization_id, user_id, role)
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(input.id)
            .bind(input.organization_id)
            .bind(input.user_id)
            .bind(input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a membership by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrganizationMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organization_members WHERE id = $1");
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the membership binding `user_id` to `organization_id`, if any.
    pub async fn find_membership(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<Option<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organization_members
             WHERE organization_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List the members of an organization, oldest first.
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organization_members
             WHERE organization_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Count the admins of an organization.
    pub async fn count_admins(pool: &PgPool, organization_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM organization_members
             WHERE organization_id = $1 AND role = $2",
        )
        .bind(organization_id)
        .bind(MemberRole::Admin)
        .fetch_one(pool)
        .await
    }

    /// Update a membership. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrganizationMember,
    ) -> Result<Option<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "UPDATE organization_members SET
                organization_id = COALESCE($2, organization_id),
                user_id = COALESCE($3, user_id),
                role = COALESCE($4, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(id)
            .bind(input.organization_id)
            .bind(input.user_id)
            .bind(input.role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a membership. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organization_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
