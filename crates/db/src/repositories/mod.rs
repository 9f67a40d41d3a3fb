//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod budget_repo;
pub mod organization_member_repo;
pub mod organization_repo;

pub use budget_repo::BudgetRepo;
pub use organization_member_repo::OrganizationMemberRepo;
pub use organization_repo::OrganizationRepo;
