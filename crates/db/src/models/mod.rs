//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` struct matching the database row
//! - A `Deserialize` create DTO for inserts (`id` optional, timestamps set
//!   by the database)
//! - A `Deserialize` update DTO (all `Option` fields) for patches

use budgetra_core::error::CoreError;
use validator::Validate;

pub mod budget;
pub mod organization;
pub mod organization_member;

/// Run `validator` rules on a DTO, mapping failures to [`CoreError::Validation`].
pub fn validate_fields<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}
