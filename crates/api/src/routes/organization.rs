//! Route definitions for the `/organizations` resource.
//!
//! Also nests members and budgets under
//! `/organizations/{organization_id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{budget, member, organization};
use crate::state::AppState;

/// Routes mounted at `/organizations`.
///
/// ```text
/// GET    /                                      -> list
/// POST   /                                      -> create
/// GET    /{organization_id}                     -> get_by_id
/// PUT    /{organization_id}                     -> update
/// DELETE /{organization_id}                     -> delete
///
/// GET    /{organization_id}/members             -> list_by_organization
/// POST   /{organization_id}/members             -> create
/// PUT    /{organization_id}/members/{id}        -> update
/// DELETE /{organization_id}/members/{id}        -> delete
///
/// GET    /{organization_id}/budgets             -> list_by_organization
/// POST   /{organization_id}/budgets             -> create
/// GET    /{organization_id}/budgets/{id}        -> get_by_id
/// PUT    /{organization_id}/budgets/{id}        -> update
/// DELETE /{organization_id}/budgets/{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    let member_routes = Router::new()
        .route(
            "/",
            get(member::list_by_organization).post(member::create),
        )
        .route("/{id}", put(member::update).delete(member::delete));

    let budget_routes = Router::new()
        .route(
            "/",
            get(budget::list_by_organization).post(budget::create),
        )
        .route(
            "/{id}",
            get(budget::get_by_id)
                .put(budget::update)
                .delete(budget::delete),
        );

    Router::new()
        .route("/", get(organization::list).post(organization::create))
        .route(
            "/{organization_id}",
            get(organization::get_by_id)
                .put(organization::update)
                .delete(organization::delete),
        )
        .nest("/{organization_id}/members", member_routes)
        .nest("/{organization_id}/budgets", budget_routes)
}
