//! Repository for the `organizations` table.

use budgetra_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use crate::models::organization_member::{MemberRole, OrganizationMember};
use crate::repositories::organization_member_repo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!(
            "INSERT INTO organizations (id, name)
             VALUES (COALESCE($1, gen_random_uuid()), $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(input.id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Create an organization and make `user_id` its first admin, atomically.
    pub async fn create_with_admin(
        pool: &PgPool,
        input: &CreateOrganization,
        user_id: DbId,
    ) -> Result<(Organization, OrganizationMember), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO organizations (id, name)
             VALUES (COALESCE($1, gen_random_uuid()), $2)
             RETURNING {COLUMNS}"
        );
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(input.id)
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO organization_members (organization_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {}",
            organization_member_repo::COLUMNS
        );
        let member = sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization.id)
            .bind(user_id)
            .bind(MemberRole::Admin)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(organization_id = %organization.id, %user_id, "Organization created");
        Ok((organization, member))
    }

    /// Find an organization by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every organization ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations ORDER BY name, created_at");
        sqlx::query_as::<_, Organization>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the organizations `user_id` belongs to, ordered by name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        sqlx::query_as::<_, Organization>(
            "SELECT o.id, o.name, o.created_at, o.updated_at
             FROM organizations o
             JOIN organization_members m ON m.organization_id = o.id
             WHERE m.user_id = $1
             ORDER BY o.name, o.created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Update an organization. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrganization,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET
                name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete an organization and, by cascade, its members and budgets.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
