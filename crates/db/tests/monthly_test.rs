//! Integration tests for month resolution, deletion and yearly loading.

mod common;

use common::{month, setup_db, year};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use tally_db::entities::{expense_categories, income_sources, monthly_data};
use tally_db::{
    ExpenseRepository, IncomeRepository, LedgerError, MonthlyRepository,
    repositories::{CreateIncomeInput, UpdateExpenseInput},
};
use tally_shared::{Amount, MonthConflictPolicy};

const POLICY: MonthConflictPolicy = MonthConflictPolicy::ReturnExisting;

#[tokio::test]
async fn test_first_month_gets_default_categories() {
    let db = setup_db().await;
    let repo = MonthlyRepository::new(db.clone());

    let created = repo.get_or_create(&month("2025-01"), POLICY).await.unwrap();

    assert_eq!(created.month.month, "2025-01");
    assert!(created.incomes.is_empty());

    let names: Vec<_> = created.expenses.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Rent", "Groceries", "Car Insurance", "Clothes", "Other"]);

    let paid_toggles: Vec<_> = created.expenses.iter().map(|e| e.show_paid_status).collect();
    assert_eq!(paid_toggles, [true, false, true, false, false]);
    assert!(created.expenses.iter().all(|e| e.budgeted_amount.is_zero()));
    assert!(created.expenses.iter().all(|e| !e.is_paid));
}

#[tokio::test]
async fn test_get_or_create_is_idempotent() {
    let db = setup_db().await;
    let repo = MonthlyRepository::new(db.clone());

    let first = repo.get_or_create(&month("2025-03"), POLICY).await.unwrap();
    let second = repo.get_or_create(&month("2025-03"), POLICY).await.unwrap();

    assert_eq!(first.month.id, second.month.id);
    assert_eq!(monthly_data::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(expense_categories::Entity::find().count(&db).await.unwrap(), 5);
}

#[tokio::test]
async fn test_new_month_carries_categories_forward() {
    let db = setup_db().await;
    let months = MonthlyRepository::new(db.clone());
    let expenses = ExpenseRepository::new(db.clone());
    let incomes = IncomeRepository::new(db.clone());

    let january = months.get_or_create(&month("2025-01"), POLICY).await.unwrap();
    for expense in &january.expenses {
        let update = match expense.name.as_str() {
            "Rent" => UpdateExpenseInput {
                budgeted_amount: Some(Amount::new(dec!(1200))),
                actual_amount: Some(Amount::new(dec!(1200))),
                is_paid: Some(true),
                ..Default::default()
            },
            "Groceries" => UpdateExpenseInput {
                budgeted_amount: Some(Amount::new(dec!(400))),
                actual_amount: Some(Amount::new(dec!(380))),
                ..Default::default()
            },
            _ => continue,
        };
        expenses.update(expense.id, update).await.unwrap();
    }
    incomes
        .create(
            &month("2025-01"),
            CreateIncomeInput {
                name: "Salary".to_string(),
                expected_amount: Amount::new(dec!(3000)),
                actual_amount: Amount::new(dec!(3000)),
            },
        )
        .await
        .unwrap();

    let february = months.get_or_create(&month("2025-02"), POLICY).await.unwrap();

    assert!(february.incomes.is_empty());
    assert_eq!(february.expenses.len(), 5);

    let rent = &february.expenses[0];
    assert_eq!(rent.name, "Rent");
    assert_eq!(Amount::new(rent.budgeted_amount), Amount::new(dec!(1200)));
    assert!(rent.actual_amount.is_zero());
    assert!(!rent.is_paid);
    assert!(rent.show_paid_status);

    let groceries = &february.expenses[1];
    assert_eq!(groceries.name, "Groceries");
    assert_eq!(Amount::new(groceries.budgeted_amount), Amount::new(dec!(400)));
    assert!(groceries.actual_amount.is_zero());
    assert!(!groceries.is_paid);
}

#[tokio::test]
async fn test_carry_forward_uses_closest_earlier_month() {
    let db = setup_db().await;
    let months = MonthlyRepository::new(db.clone());
    let expenses = ExpenseRepository::new(db.clone());

    let march = months.get_or_create(&month("2025-03"), POLICY).await.unwrap();
    // Trim March down to one renamed category.
    for (idx, expense) in march.expenses.iter().enumerate() {
        if idx == 0 {
            expenses
                .update(
                    expense.id,
                    UpdateExpenseInput {
                        name: Some("Mortgage".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        } else {
            expenses.delete(expense.id).await.unwrap();
        }
    }

    // January precedes March, so it still gets the defaults.
    let january = months.get_or_create(&month("2025-01"), POLICY).await.unwrap();
    assert_eq!(january.expenses.len(), 5);

    // June copies March, the closest earlier month.
    let june = months.get_or_create(&month("2025-06"), POLICY).await.unwrap();
    let names: Vec<_> = june.expenses.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Mortgage"]);
}

#[tokio::test]
async fn test_empty_previous_month_falls_back_to_defaults() {
    let db = setup_db().await;
    let months = MonthlyRepository::new(db.clone());
    let expenses = ExpenseRepository::new(db.clone());

    let january = months.get_or_create(&month("2025-01"), POLICY).await.unwrap();
    for expense in &january.expenses {
        expenses.delete(expense.id).await.unwrap();
    }

    let february = months.get_or_create(&month("2025-02"), POLICY).await.unwrap();
    assert_eq!(february.expenses.len(), 5);
    assert_eq!(february.expenses[0].name, "Rent");
}

#[tokio::test]
async fn test_conflict_return_existing() {
    let db = setup_db().await;
    let repo = MonthlyRepository::new(db.clone());

    let winner = repo.get_or_create(&month("2025-04"), POLICY).await.unwrap();
    let loser = repo
        .create_month(&month("2025-04"), MonthConflictPolicy::ReturnExisting)
        .await
        .unwrap();

    assert_eq!(winner.month.id, loser.month.id);
    assert_eq!(loser.expenses.len(), 5);
    assert_eq!(monthly_data::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(expense_categories::Entity::find().count(&db).await.unwrap(), 5);
}

#[tokio::test]
async fn test_conflict_reject() {
    let db = setup_db().await;
    let repo = MonthlyRepository::new(db.clone());

    repo.get_or_create(&month("2025-04"), POLICY).await.unwrap();
    let result = repo
        .create_month(&month("2025-04"), MonthConflictPolicy::Reject)
        .await;

    assert!(matches!(result, Err(LedgerError::MonthExists(ref m)) if m == "2025-04"));
    // The losing transaction left nothing behind.
    assert_eq!(expense_categories::Entity::find().count(&db).await.unwrap(), 5);
}

#[tokio::test]
async fn test_delete_removes_only_that_month() {
    let db = setup_db().await;
    let months = MonthlyRepository::new(db.clone());
    let incomes = IncomeRepository::new(db.clone());

    for key in ["2025-01", "2025-02"] {
        months.get_or_create(&month(key), POLICY).await.unwrap();
        incomes
            .create(
                &month(key),
                CreateIncomeInput {
                    name: "Salary".to_string(),
                    expected_amount: Amount::new(dec!(100)),
                    actual_amount: Amount::ZERO,
                },
            )
            .await
            .unwrap();
    }

    months.delete(&month("2025-01")).await.unwrap();

    assert!(months.find(&month("2025-01")).await.unwrap().is_none());
    let remaining = months.find(&month("2025-02")).await.unwrap().unwrap();
    assert_eq!(remaining.incomes.len(), 1);
    assert_eq!(remaining.expenses.len(), 5);
    assert_eq!(income_sources::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(expense_categories::Entity::find().count(&db).await.unwrap(), 5);
}

#[tokio::test]
async fn test_delete_missing_month() {
    let db = setup_db().await;
    let repo = MonthlyRepository::new(db);

    let result = repo.delete(&month("2030-01")).await;
    assert!(matches!(result, Err(LedgerError::MonthNotFound(_))));
}

#[tokio::test]
async fn test_list_most_recent_first() {
    let db = setup_db().await;
    let repo = MonthlyRepository::new(db);

    for key in ["2024-11", "2025-02", "2024-12"] {
        repo.get_or_create(&month(key), POLICY).await.unwrap();
    }

    let keys: Vec<_> = repo.list().await.unwrap().into_iter().map(|m| m.month).collect();
    assert_eq!(keys, ["2025-02", "2024-12", "2024-11"]);

    assert_eq!(repo.list_years().await.unwrap(), ["2025", "2024"]);
}

#[tokio::test]
async fn test_load_year_groups_rows_by_month() {
    let db = setup_db().await;
    let months = MonthlyRepository::new(db.clone());
    let incomes = IncomeRepository::new(db.clone());

    for key in ["2025-02", "2024-12", "2025-01"] {
        months.get_or_create(&month(key), POLICY).await.unwrap();
    }
    incomes
        .create(
            &month("2025-02"),
            CreateIncomeInput {
                name: "Salary".to_string(),
                expected_amount: Amount::new(dec!(2500)),
                actual_amount: Amount::new(dec!(2600.50)),
            },
        )
        .await
        .unwrap();

    let ledgers = months.load_year(&year("2025")).await.unwrap();

    let keys: Vec<_> = ledgers.iter().map(|l| l.month.as_str()).collect();
    assert_eq!(keys, ["2025-01", "2025-02"]);
    assert!(ledgers[0].incomes.is_empty());
    assert_eq!(ledgers[1].incomes.len(), 1);
    assert_eq!(ledgers[1].incomes[0].actual, Amount::new(dec!(2600.50)));
    assert_eq!(ledgers[1].expenses.len(), 5);

    assert!(months.load_year(&year("2023")).await.unwrap().is_empty());
}
