//! The `{ "data": ... }` envelope every JSON API payload is wrapped in.
//!
//! Errors use the `{ "error", "code" }` shape instead (see [`crate::error`]).

use axum::Json;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(DataResponse::json(budgets))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}
