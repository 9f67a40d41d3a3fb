//! Rules for budget periods and amounts.
//!
//! The database enforces `start_date <= end_date` with a check constraint;
//! these helpers reject bad input before it reaches the database so callers
//! get a validation error instead of a constraint violation.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::Date;

/// Reject a period whose end precedes its start. Single-day periods are valid.
pub fn validate_period(start_date: Date, end_date: Date) -> Result<(), CoreError> {
    if start_date > end_date {
        return Err(CoreError::Validation(format!(
            "start_date ({start_date}) must not be after end_date ({end_date})"
        )));
    }
    Ok(())
}

/// Reject negative budget amounts.
pub fn validate_amount(amount: Decimal) -> Result<(), CoreError> {
    if amount < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// Resolve the period a partial update would leave behind.
///
/// Fields absent from the patch keep their current value.
pub fn merged_period(
    current: (Date, Date),
    start_date: Option<Date>,
    end_date: Option<Date>,
) -> (Date, Date) {
    (
        start_date.unwrap_or(current.0),
        end_date.unwrap_or(current.1),
    )
}
