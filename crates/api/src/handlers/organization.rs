//! Handlers for the `/organizations` resource.
//!
//! Listing and creation act on the signed-in user; everything addressed by id
//! goes through [`OrgAccess`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use budgetra_core::error::CoreError;
use budgetra_core::types::DbId;
use budgetra_db::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use budgetra_db::models::validate_fields;
use budgetra_db::repositories::OrganizationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::OrgAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/organizations
///
/// The caller becomes the organization's first admin.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateOrganization>,
) -> AppResult<(StatusCode, Json<DataResponse<Organization>>)> {
    validate_fields(&input)?;
    let (organization, _admin) =
        OrganizationRepo::create_with_admin(&state.pool, &input, user.id()).await?;
    tracing::info!(organization_id = %organization.id, user_id = %user.id(), "Organization created");
    Ok((StatusCode::CREATED, DataResponse::json(organization)))
}

/// GET /api/v1/organizations
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<DataResponse<Vec<Organization>>>> {
    let organizations = OrganizationRepo::list_for_user(&state.pool, user.id()).await?;
    Ok(DataResponse::json(organizations))
}

/// GET /api/v1/organizations/{organization_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Organization>>> {
    let access = OrgAccess::load(&state.pool, id, &user).await?;
    Ok(DataResponse::json(access.organization))
}

/// PUT /api/v1/organizations/{organization_id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrganization>,
) -> AppResult<Json<DataResponse<Organization>>> {
    OrgAccess::load(&state.pool, id, &user).await?.require_admin()?;
    validate_fields(&input)?;
    let organization = OrganizationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id,
        }))?;
    Ok(DataResponse::json(organization))
}

/// DELETE /api/v1/organizations/{organization_id}
///
/// Members and budgets are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    OrgAccess::load(&state.pool, id, &user).await?.require_admin()?;
    OrganizationRepo::delete(&state.pool, id).await?;
    tracing::info!(organization_id = %id, user_id = %user.id(), "Organization deleted");
    Ok(StatusCode::NO_CONTENT)
}
