//! Budget entity model and DTOs.

use budgetra_core::budget::{merged_period, validate_amount, validate_period};
use budgetra_core::error::CoreError;
use budgetra_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::validate_fields;

/// A row from the `budgets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Budget {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    /// Unit-less; the currency is not modelled.
    pub amount: Decimal,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a budget.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBudget {
    #[serde(default)]
    pub id: Option<DbId>,
    pub organization_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub amount: Decimal,
    pub start_date: Date,
    pub end_date: Date,
}

impl CreateBudget {
    /// Field rules plus the non-negative amount and ordered period checks.
    pub fn check(&self) -> Result<(), CoreError> {
        validate_fields(self)?;
        validate_amount(self.amount)?;
        validate_period(self.start_date, self.end_date)
    }
}

/// DTO for updating a budget. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBudget {
    pub organization_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl UpdateBudget {
    /// Validate the patch against the row it will be applied to, so a change
    /// to only one bound cannot invert the period.
    pub fn check_against(&self, current: &Budget) -> Result<(), CoreError> {
        validate_fields(self)?;
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        let (start, end) = merged_period(
            (current.start_date, current.end_date),
            self.start_date,
            self.end_date,
        );
        validate_period(start, end)
    }
}
