//! Request extractors and authorization helpers.
//!
//! - [`auth::CurrentUser`]: the identity currently held by the session store.
//! - [`rbac::OrgAccess`]: the caller's membership in the organization named
//!   by the request path, with role checks on top.

pub mod auth;
pub mod rbac;
