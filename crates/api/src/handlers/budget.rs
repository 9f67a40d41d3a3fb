//! Handlers for budgets.
//!
//! Budgets are nested under organizations:
//! `/organizations/{organization_id}/budgets[/{id}]`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use budgetra_core::error::CoreError;
use budgetra_core::types::{Date, DbId};
use budgetra_db::models::budget::{Budget, CreateBudget, UpdateBudget};
use budgetra_db::repositories::BudgetRepo;
use budgetra_db::DbPool;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::OrgAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST .../budgets`. The organization comes from the path.
#[derive(Debug, Deserialize)]
pub struct NewBudget {
    #[serde(default)]
    pub id: Option<DbId>,
    pub name: String,
    pub amount: Decimal,
    pub start_date: Date,
    pub end_date: Date,
}

/// GET /api/v1/organizations/{organization_id}/budgets
pub async fn list_by_organization(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(organization_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Budget>>>> {
    OrgAccess::load(&state.pool, organization_id, &user).await?;
    let budgets = BudgetRepo::list_by_organization(&state.pool, organization_id).await?;
    Ok(DataResponse::json(budgets))
}

/// POST /api/v1/organizations/{organization_id}/budgets
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(organization_id): Path<DbId>,
    Json(input): Json<NewBudget>,
) -> AppResult<(StatusCode, Json<DataResponse<Budget>>)> {
    OrgAccess::load(&state.pool, organization_id, &user)
        .await?
        .require_budget_manager()?;

    let input = CreateBudget {
        id: input.id,
        organization_id,
        name: input.name,
        amount: input.amount,
        start_date: input.start_date,
        end_date: input.end_date,
    };
    input.check()?;

    let budget = BudgetRepo::create(&state.pool, &input).await?;
    tracing::info!(%organization_id, budget_id = %budget.id, "Budget created");
    Ok((StatusCode::CREATED, DataResponse::json(budget)))
}

/// GET /api/v1/organizations/{organization_id}/budgets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((organization_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Budget>>> {
    OrgAccess::load(&state.pool, organization_id, &user).await?;
    let budget = find_scoped(&state.pool, organization_id, id).await?;
    Ok(DataResponse::json(budget))
}

/// PUT /api/v1/organizations/{organization_id}/budgets/{id}
///
/// Ignores `organization_id` in the body; budgets do not move between
/// organizations through this route.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((organization_id, id)): Path<(DbId, DbId)>,
    Json(mut input): Json<UpdateBudget>,
) -> AppResult<Json<DataResponse<Budget>>> {
    OrgAccess::load(&state.pool, organization_id, &user)
        .await?
        .require_budget_manager()?;
    let current = find_scoped(&state.pool, organization_id, id).await?;

    input.organization_id = None;
    input.check_against(&current)?;

    let budget = BudgetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Budget",
            id,
        }))?;
    Ok(DataResponse::json(budget))
}

/// DELETE /api/v1/organizations/{organization_id}/budgets/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((organization_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    OrgAccess::load(&state.pool, organization_id, &user)
        .await?
        .require_budget_manager()?;
    find_scoped(&state.pool, organization_id, id).await?;
    BudgetRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_scoped(pool: &DbPool, organization_id: DbId, id: DbId) -> AppResult<Budget> {
    BudgetRepo::find_by_id(pool, id)
        .await?
        .filter(|b| b.organization_id == organization_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Budget",
            id,
        }))
}
