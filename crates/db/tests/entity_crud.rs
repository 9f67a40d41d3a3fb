//! Integration tests for the organization, membership and budget repositories.
//!
//! Exercises the repository layer against a real database:
//! - Organization creation with its first admin
//! - Membership uniqueness and role changes
//! - Budget CRUD and the period check constraint
//! - Cascade delete from organizations
//! - `updated_at` trigger behaviour

use assert_matches::assert_matches;
use budgetra_db::models::budget::{CreateBudget, UpdateBudget};
use budgetra_db::models::organization::{CreateOrganization, UpdateOrganization};
use budgetra_db::models::organization_member::{
    CreateOrganizationMember, MemberRole, UpdateOrganizationMember,
};
use budgetra_db::repositories::{BudgetRepo, OrganizationMemberRepo, OrganizationRepo};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_organization(name: &str) -> CreateOrganization {
    CreateOrganization {
        id: None,
        name: name.to_string(),
    }
}

fn new_member(organization_id: Uuid, user_id: Uuid, role: MemberRole) -> CreateOrganizationMember {
    CreateOrganizationMember {
        id: None,
        organization_id,
        user_id,
        role,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_budget(organization_id: Uuid, name: &str, start: NaiveDate, end: NaiveDate) -> CreateBudget {
    CreateBudget {
        id: None,
        organization_id,
        name: name.to_string(),
        amount: Decimal::new(250_000, 2),
        start_date: start,
        end_date: end,
    }
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_organization_generates_id(pool: PgPool) {
    let org = OrganizationRepo::create(&pool, &new_organization("Acme"))
        .await
        .unwrap();
    assert_eq!(org.name, "Acme");
    assert!(!org.id.is_nil());
    assert_eq!(org.created_at, org.updated_at);

    let found = OrganizationRepo::find_by_id(&pool, org.id).await.unwrap();
    assert_eq!(found.unwrap().name, "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_organization_with_explicit_id(pool: PgPool) {
    let id = Uuid::new_v4();
    let input = CreateOrganization {
        id: Some(id),
        name: "Explicit".to_string(),
    };
    let org = OrganizationRepo::create(&pool, &input).await.unwrap();
    assert_eq!(org.id, id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_admin_adds_admin_member(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let (org, member) =
        OrganizationRepo::create_with_admin(&pool, &new_organization("Founders"), user_id)
            .await
            .unwrap();

    assert_eq!(member.organization_id, org.id);
    assert_eq!(member.user_id, user_id);
    assert_eq!(member.role, MemberRole::Admin);

    let admins = OrganizationMemberRepo::count_admins(&pool, org.id).await.unwrap();
    assert_eq!(admins, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_advances_updated_at(pool: PgPool) {
    let org = OrganizationRepo::create(&pool, &new_organization("Before"))
        .await
        .unwrap();

    let update = UpdateOrganization {
        name: Some("After".to_string()),
    };
    let updated = OrganizationRepo::update(&pool, org.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, org.id);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.created_at, org.created_at);
    assert!(updated.updated_at > org.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_organization_returns_none(pool: PgPool) {
    let result = OrganizationRepo::update(&pool, Uuid::new_v4(), &UpdateOrganization::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_user_only_returns_memberships(pool: PgPool) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let (beta, _) = OrganizationRepo::create_with_admin(&pool, &new_organization("Beta"), alice)
        .await
        .unwrap();
    let (alpha, _) = OrganizationRepo::create_with_admin(&pool, &new_organization("Alpha"), alice)
        .await
        .unwrap();
    OrganizationRepo::create_with_admin(&pool, &new_organization("Gamma"), bob)
        .await
        .unwrap();

    let orgs = OrganizationRepo::list_for_user(&pool, alice).await.unwrap();
    let ids: Vec<Uuid> = orgs.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![alpha.id, beta.id]);

    let all = OrganizationRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 3);
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_membership_is_rejected(pool: PgPool) {
    let org = OrganizationRepo::create(&pool, &new_organization("Dup"))
        .await
        .unwrap();
    let user_id = Uuid::new_v4();

    OrganizationMemberRepo::create(&pool, &new_member(org.id, user_id, MemberRole::Member))
        .await
        .unwrap();
    let err = OrganizationMemberRepo::create(
        &pool,
        &new_member(org.id, user_id, MemberRole::FinanceLead),
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_for_missing_organization_is_rejected(pool: PgPool) {
    let err = OrganizationMemberRepo::create(
        &pool,
        &new_member(Uuid::new_v4(), Uuid::new_v4(), MemberRole::Member),
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23503"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_member_role(pool: PgPool) {
    let org = OrganizationRepo::create(&pool, &new_organization("Roles"))
        .await
        .unwrap();
    let member = OrganizationMemberRepo::create(
        &pool,
        &new_member(org.id, Uuid::new_v4(), MemberRole::Member),
    )
    .await
    .unwrap();

    let update = UpdateOrganizationMember {
        role: Some(MemberRole::FinanceLead),
        ..Default::default()
    };
    let updated = OrganizationMemberRepo::update(&pool, member.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.role, MemberRole::FinanceLead);
    assert_eq!(updated.user_id, member.user_id);

    let found = OrganizationMemberRepo::find_membership(&pool, org.id, member.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, member.id);
    assert_eq!(found.role, MemberRole::FinanceLead);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_and_delete_members(pool: PgPool) {
    let owner = Uuid::new_v4();
    let (org, _) = OrganizationRepo::create_with_admin(&pool, &new_organization("Team"), owner)
        .await
        .unwrap();
    let member = OrganizationMemberRepo::create(
        &pool,
        &new_member(org.id, Uuid::new_v4(), MemberRole::Member),
    )
    .await
    .unwrap();

    let members = OrganizationMemberRepo::list_by_organization(&pool, org.id)
        .await
        .unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_id, owner);

    assert!(OrganizationMemberRepo::delete(&pool, member.id).await.unwrap());
    assert!(!OrganizationMemberRepo::delete(&pool, member.id).await.unwrap());
    assert!(OrganizationMemberRepo::find_by_id(&pool, member.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_crud(pool: PgPool) {
    let org = OrganizationRepo::create(&pool, &new_organization("Budgets"))
        .await
        .unwrap();

    let h2 = BudgetRepo::create(&pool, &new_budget(org.id, "H2", date(2026, 7, 1), date(2026, 12, 31)))
        .await
        .unwrap();
    let h1 = BudgetRepo::create(&pool, &new_budget(org.id, "H1", date(2026, 1, 1), date(2026, 6, 30)))
        .await
        .unwrap();
    assert_eq!(h1.amount, Decimal::new(250_000, 2));

    let listed = BudgetRepo::list_by_organization(&pool, org.id).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["H1", "H2"]);

    let update = UpdateBudget {
        amount: Some(Decimal::new(300_000, 2)),
        ..Default::default()
    };
    let updated = BudgetRepo::update(&pool, h2.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.amount, Decimal::new(300_000, 2));
    assert_eq!(updated.start_date, h2.start_date);
    assert!(updated.updated_at > h2.updated_at);

    assert!(BudgetRepo::delete(&pool, h1.id).await.unwrap());
    assert!(BudgetRepo::find_by_id(&pool, h1.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_period_check_constraint(pool: PgPool) {
    let org = OrganizationRepo::create(&pool, &new_organization("Check"))
        .await
        .unwrap();

    let err = BudgetRepo::create(
        &pool,
        &new_budget(org.id, "Inverted", date(2026, 12, 31), date(2026, 1, 1)),
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("ck_budgets_period"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_organization_cascades(pool: PgPool) {
    let (org, member) =
        OrganizationRepo::create_with_admin(&pool, &new_organization("Gone"), Uuid::new_v4())
            .await
            .unwrap();
    let budget = BudgetRepo::create(
        &pool,
        &new_budget(org.id, "FY", date(2026, 1, 1), date(2026, 12, 31)),
    )
    .await
    .unwrap();

    assert!(OrganizationRepo::delete(&pool, org.id).await.unwrap());

    assert!(OrganizationMemberRepo::find_by_id(&pool, member.id)
        .await
        .unwrap()
        .is_none());
    assert!(BudgetRepo::find_by_id(&pool, budget.id).await.unwrap().is_none());
}
