//! Handlers for organization members.
//!
//! Members are nested under organizations:
//! `/organizations/{organization_id}/members[/{id}]`
//!
//! An organization always keeps at least one admin: the last admin can be
//! neither demoted nor removed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use budgetra_core::error::CoreError;
use budgetra_core::types::DbId;
use budgetra_db::models::organization_member::{
    CreateOrganizationMember, MemberRole, OrganizationMember, UpdateOrganizationMember,
};
use budgetra_db::repositories::OrganizationMemberRepo;
use budgetra_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::OrgAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST .../members`. The organization comes from the path.
#[derive(Debug, Deserialize)]
pub struct AddMember {
    pub user_id: DbId,
    #[serde(default)]
    pub role: MemberRole,
}

/// Body of `PUT .../members/{id}`. Only the role of a membership can change.
#[derive(Debug, Deserialize)]
pub struct ChangeRole {
    pub role: MemberRole,
}

/// GET /api/v1/organizations/{organization_id}/members
pub async fn list_by_organization(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(organization_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OrganizationMember>>>> {
    OrgAccess::load(&state.pool, organization_id, &user).await?;
    let members = OrganizationMemberRepo::list_by_organization(&state.pool, organization_id).await?;
    Ok(DataResponse::json(members))
}

/// POST /api/v1/organizations/{organization_id}/members
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(organization_id): Path<DbId>,
    Json(input): Json<AddMember>,
) -> AppResult<(StatusCode, Json<DataResponse<OrganizationMember>>)> {
    OrgAccess::load(&state.pool, organization_id, &user)
        .await?
        .require_admin()?;

    let member = OrganizationMemberRepo::create(
        &state.pool,
        &CreateOrganizationMember {
            id: None,
            organization_id,
            user_id: input.user_id,
            role: input.role,
        },
    )
    .await?;
    tracing::info!(
        %organization_id,
        member_id = %member.id,
        role = %member.role,
        "Member added"
    );
    Ok((StatusCode::CREATED, DataResponse::json(member)))
}

/// PUT /api/v1/organizations/{organization_id}/members/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((organization_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<ChangeRole>,
) -> AppResult<Json<DataResponse<OrganizationMember>>> {
    OrgAccess::load(&state.pool, organization_id, &user)
        .await?
        .require_admin()?;
    let current = find_scoped(&state.pool, organization_id, id).await?;

    if current.role == MemberRole::Admin && input.role != MemberRole::Admin {
        ensure_not_last_admin(&state.pool, organization_id).await?;
    }

    let patch = UpdateOrganizationMember {
        role: Some(input.role),
        ..Default::default()
    };
    let member = OrganizationMemberRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "OrganizationMember",
            id,
        }))?;
    Ok(DataResponse::json(member))
}

/// DELETE /api/v1/organizations/{organization_id}/members/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((organization_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    OrgAccess::load(&state.pool, organization_id, &user)
        .await?
        .require_admin()?;
    let current = find_scoped(&state.pool, organization_id, id).await?;

    if current.role == MemberRole::Admin {
        ensure_not_last_admin(&state.pool, organization_id).await?;
    }

    OrganizationMemberRepo::delete(&state.pool, id).await?;
    tracing::info!(%organization_id, member_id = %id, "Member removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Load a membership, treating one from another organization as missing.
async fn find_scoped(
    pool: &DbPool,
    organization_id: DbId,
    id: DbId,
) -> AppResult<OrganizationMember> {
    OrganizationMemberRepo::find_by_id(pool, id)
        .await?
        .filter(|m| m.organization_id == organization_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "OrganizationMember",
            id,
        }))
}

async fn ensure_not_last_admin(pool: &DbPool, organization_id: DbId) -> AppResult<()> {
    if OrganizationMemberRepo::count_admins(pool, organization_id).await? <= 1 {
        return Err(AppError::Core(CoreError::Conflict(
            "An organization must keep at least one admin".into(),
        )));
    }
    Ok(())
}
