//! Organization entity model and DTOs.

use budgetra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an organization. `id` is generated when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganization {
    #[serde(default)]
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// DTO for updating an organization. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrganization {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
