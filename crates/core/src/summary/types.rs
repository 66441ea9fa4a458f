//! Yearly summary data types.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::{Amount, MonthKey, Year};

/// Income figures of one income source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeLine {
    /// Expected amount.
    pub expected: Amount,
    /// Amount actually received.
    pub actual: Amount,
}

/// Expense figures of one expense category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLine {
    /// Category name, used as the grouping key across months.
    pub name: String,
    /// Budgeted amount.
    pub budgeted: Amount,
    /// Amount actually spent.
    pub actual: Amount,
}

/// One month's ledger rows, input to the aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLedger {
    /// Month key.
    pub month: MonthKey,
    /// Income rows.
    pub incomes: Vec<IncomeLine>,
    /// Expense rows.
    pub expenses: Vec<ExpenseLine>,
}

/// Per-month figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Month key.
    pub month: MonthKey,
    /// Sum of expected income.
    pub expected_income: Amount,
    /// Sum of actual income.
    pub actual_income: Amount,
    /// `max(expected_income, actual_income)`.
    pub effective_income: Amount,
    /// Sum of budgeted expenses.
    pub budgeted: Amount,
    /// Sum of actual expenses.
    pub actual_expenses: Amount,
    /// `effective_income - actual_expenses`.
    pub savings: Amount,
}

/// Year totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTotals {
    /// Sum of every month's expected income.
    pub expected_income: Amount,
    /// Sum of every month's actual income.
    pub actual_income: Amount,
    /// `max(expected_income, actual_income)` over the summed figures.
    pub effective_income: Amount,
    /// Sum of budgeted expenses.
    pub budgeted: Amount,
    /// Sum of actual expenses.
    pub actual_expenses: Amount,
    /// `effective_income - actual_expenses`.
    pub savings: Amount,
    /// Savings as a percentage of effective income, 0 without income.
    pub savings_rate: Decimal,
}

/// Spend on one category name across the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category name.
    pub name: String,
    /// Summed budget.
    pub budgeted: Amount,
    /// Summed actual spend.
    pub actual: Amount,
    /// `budgeted - actual`; negative when over budget.
    pub variance: Amount,
}

/// A month singled out by one of its figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthHighlight {
    /// Month key.
    pub month: MonthKey,
    /// The figure that made it stand out.
    pub amount: Amount,
}

/// The category with the highest spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHighlight {
    /// Category name.
    pub name: String,
    /// Actual spend.
    pub amount: Amount,
}

/// Notable months and categories; all `None` for a year without data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    /// Month with the highest savings.
    pub best_month: Option<MonthHighlight>,
    /// Month with the lowest savings.
    pub worst_month: Option<MonthHighlight>,
    /// Month with the highest actual expenses.
    pub highest_spending_month: Option<MonthHighlight>,
    /// Category with the highest actual spend.
    pub top_category: Option<CategoryHighlight>,
}

/// Aggregate report for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    /// The year.
    pub year: Year,
    /// Months with data, ascending.
    pub months: Vec<MonthSummary>,
    /// Year totals.
    pub totals: YearTotals,
    /// Category breakdown, highest actual spend first.
    pub categories: Vec<CategoryTotal>,
    /// Highlights.
    pub highlights: Highlights,
}
