//! Repository for the `budgets` table.

use budgetra_core::types::DbId;
use sqlx::PgPool;

use crate::models::budget::{Budget, CreateBudget, UpdateBudget};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, organization_id, name, amount, start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for budgets.
pub struct BudgetRepo;

impl BudgetRepo {
    /// Insert a new budget, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBudget) -> Result<Budget, sqlx::Error> {
        let query = format!(
            "INSERT INTO budgets (id, organization_id, name, amount, start_date, end_date)
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(input.id)
            .bind(input.organization_id)
            .bind(&input.name)
            .bind(input.amount)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a budget by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM budgets WHERE id = $1");
        sqlx::query_as::<_, Budget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the budgets of an organization ordered by period start.
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<Budget>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM budgets
             WHERE organization_id = $1
             ORDER BY start_date, name"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Update a budget. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBudget,
    ) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!(
            "UPDATE budgets SET
                organization_id = COALESCE($2, organization_id),
                name = COALESCE($3, name),
                amount = COALESCE($4, amount),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(id)
            .bind(input.organization_id)
            .bind(&input.name)
            .bind(input.amount)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a budget. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
