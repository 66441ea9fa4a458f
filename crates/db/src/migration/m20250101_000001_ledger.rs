//! Ledger tables: months, their income and expense rows, and savings goals.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonthlyData::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyData::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(MonthlyData::Month)
                            .string_len(7)
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp(MonthlyData::CreatedAt))
                    .col(timestamp(MonthlyData::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncomeSources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IncomeSources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(IncomeSources::MonthlyDataId).uuid().not_null())
                    .col(ColumnDef::new(IncomeSources::Name).string().not_null())
                    .col(money(IncomeSources::ExpectedAmount))
                    .col(money(IncomeSources::ActualAmount))
                    .col(position(IncomeSources::Position))
                    .col(timestamp(IncomeSources::CreatedAt))
                    .col(timestamp(IncomeSources::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_income_sources_monthly_data")
                            .from(IncomeSources::Table, IncomeSources::MonthlyDataId)
                            .to(MonthlyData::Table, MonthlyData::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_income_sources_month")
                    .table(IncomeSources::Table)
                    .col(IncomeSources::MonthlyDataId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::MonthlyDataId).uuid().not_null())
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .col(money(ExpenseCategories::BudgetedAmount))
                    .col(money(ExpenseCategories::ActualAmount))
                    .col(flag(ExpenseCategories::IsPaid))
                    .col(flag(ExpenseCategories::ShowPaidStatus))
                    .col(position(ExpenseCategories::Position))
                    .col(timestamp(ExpenseCategories::CreatedAt))
                    .col(timestamp(ExpenseCategories::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_categories_monthly_data")
                            .from(ExpenseCategories::Table, ExpenseCategories::MonthlyDataId)
                            .to(MonthlyData::Table, MonthlyData::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expense_categories_month")
                    .table(ExpenseCategories::Table)
                    .col(ExpenseCategories::MonthlyDataId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavingsGoals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavingsGoals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SavingsGoals::Name).string().not_null())
                    .col(money(SavingsGoals::TargetAmount))
                    .col(money(SavingsGoals::CurrentAmount))
                    .col(timestamp(SavingsGoals::CreatedAt))
                    .col(timestamp(SavingsGoals::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavingsGoals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeSources::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyData::Table).if_exists().to_owned())
            .await
    }
}

/// `DECIMAL(12,2) NOT NULL DEFAULT 0`
fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(12, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn flag(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).boolean().not_null().default(false).to_owned()
}

fn position(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(0).to_owned()
}

fn timestamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum MonthlyData {
    Table,
    Id,
    Month,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IncomeSources {
    Table,
    Id,
    MonthlyDataId,
    Name,
    ExpectedAmount,
    ActualAmount,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExpenseCategories {
    Table,
    Id,
    MonthlyDataId,
    Name,
    BudgetedAmount,
    ActualAmount,
    IsPaid,
    ShowPaidStatus,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SavingsGoals {
    Table,
    Id,
    Name,
    TargetAmount,
    CurrentAmount,
    CreatedAt,
    UpdatedAt,
}
