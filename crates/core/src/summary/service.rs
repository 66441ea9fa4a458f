//! Yearly aggregation service.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tally_shared::{Amount, Year};

use super::error::SummaryError;
use super::types::{
    CategoryHighlight, CategoryTotal, Highlights, MonthHighlight, MonthLedger, MonthSummary,
    YearTotals, YearlySummary,
};

/// Service for building yearly reports.
pub struct SummaryService;

impl SummaryService {
    /// Builds the yearly report from the months of `year`.
    ///
    /// Months of other years are ignored; the rest are processed in ascending
    /// key order regardless of input order.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::Overflow` if a total does not fit a decimal.
    pub fn yearly(year: Year, mut months: Vec<MonthLedger>) -> Result<YearlySummary, SummaryError> {
        months.retain(|m| m.month.year() == year);
        months.sort_by(|a, b| a.month.cmp(&b.month));

        let summaries = months
            .iter()
            .map(Self::summarize_month)
            .collect::<Result<Vec<_>, _>>()?;
        let totals = Self::totals(&summaries)
            .ok_or_else(|| SummaryError::Overflow(year.to_string()))?;
        let categories = Self::category_breakdown(&months)
            .ok_or_else(|| SummaryError::Overflow(year.to_string()))?;
        let highlights = Self::highlights(&summaries, &categories);

        Ok(YearlySummary {
            year,
            months: summaries,
            totals,
            categories,
            highlights,
        })
    }

    /// Computes one month's figures.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::Overflow` if a sum does not fit a decimal.
    pub fn summarize_month(ledger: &MonthLedger) -> Result<MonthSummary, SummaryError> {
        let overflow = || SummaryError::Overflow(ledger.month.to_string());

        let expected_income =
            Amount::checked_sum(ledger.incomes.iter().map(|i| i.expected)).ok_or_else(overflow)?;
        let actual_income =
            Amount::checked_sum(ledger.incomes.iter().map(|i| i.actual)).ok_or_else(overflow)?;
        let effective_income = expected_income.max(actual_income);
        let budgeted =
            Amount::checked_sum(ledger.expenses.iter().map(|e| e.budgeted)).ok_or_else(overflow)?;
        let actual_expenses =
            Amount::checked_sum(ledger.expenses.iter().map(|e| e.actual)).ok_or_else(overflow)?;
        let savings = effective_income
            .checked_sub(actual_expenses)
            .ok_or_else(overflow)?;

        Ok(MonthSummary {
            month: ledger.month.clone(),
            expected_income,
            actual_income,
            effective_income,
            budgeted,
            actual_expenses,
            savings,
        })
    }

    /// Sums the monthly figures.
    ///
    /// Effective income is the larger of the two summed income figures, not the
    /// sum of each month's own maximum. `None` on overflow.
    #[must_use]
    pub fn totals(months: &[MonthSummary]) -> Option<YearTotals> {
        let expected_income = Amount::checked_sum(months.iter().map(|m| m.expected_income))?;
        let actual_income = Amount::checked_sum(months.iter().map(|m| m.actual_income))?;
        let effective_income = expected_income.max(actual_income);
        let budgeted = Amount::checked_sum(months.iter().map(|m| m.budgeted))?;
        let actual_expenses = Amount::checked_sum(months.iter().map(|m| m.actual_expenses))?;
        let savings = effective_income.checked_sub(actual_expenses)?;

        Some(YearTotals {
            expected_income,
            actual_income,
            effective_income,
            budgeted,
            actual_expenses,
            savings,
            savings_rate: Self::savings_rate(savings, effective_income),
        })
    }

    /// `100 * savings / income`, rounded to two places; 0 without income.
    #[must_use]
    pub fn savings_rate(savings: Amount, income: Amount) -> Decimal {
        let mut rate = if income.is_zero() {
            Decimal::ZERO
        } else {
            savings
                .value()
                .checked_div(income.value())
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Decimal::ZERO, |rate| rate.round_dp(2))
        };
        rate.rescale(2);
        rate
    }

    /// Groups expense rows by name and sorts by actual spend, highest first.
    ///
    /// The sort is stable: among equal spends the name seen first stays first.
    /// `None` on overflow.
    #[must_use]
    pub fn category_breakdown(months: &[MonthLedger]) -> Option<Vec<CategoryTotal>> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<CategoryTotal> = Vec::new();

        for expense in months.iter().flat_map(|m| &m.expenses) {
            let slot = *index.entry(expense.name.as_str()).or_insert_with(|| {
                totals.push(CategoryTotal {
                    name: expense.name.clone(),
                    budgeted: Amount::ZERO,
                    actual: Amount::ZERO,
                    variance: Amount::ZERO,
                });
                totals.len() - 1
            });
            let total = &mut totals[slot];
            total.budgeted = total.budgeted.checked_add(expense.budgeted)?;
            total.actual = total.actual.checked_add(expense.actual)?;
        }

        for total in &mut totals {
            total.variance = total.budgeted.checked_sub(total.actual)?;
        }
        totals.sort_by(|a, b| b.actual.cmp(&a.actual));
        Some(totals)
    }

    fn highlights(months: &[MonthSummary], categories: &[CategoryTotal]) -> Highlights {
        let month_highlight = |m: &MonthSummary, amount: Amount| MonthHighlight {
            month: m.month.clone(),
            amount,
        };

        Highlights {
            best_month: first_max_by_key(months, |m| m.savings)
                .map(|m| month_highlight(m, m.savings)),
            worst_month: months
                .iter()
                .min_by_key(|m| m.savings)
                .map(|m| month_highlight(m, m.savings)),
            highest_spending_month: first_max_by_key(months, |m| m.actual_expenses)
                .map(|m| month_highlight(m, m.actual_expenses)),
            top_category: categories.first().map(|c| CategoryHighlight {
                name: c.name.clone(),
                amount: c.actual,
            }),
        }
    }
}

/// Like `Iterator::max_by_key`, but the first of several equal maxima wins.
fn first_max_by_key<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    items.iter().fold(None, |best, item| match best {
        Some(current) if key(item) <= key(current) => Some(current),
        _ => Some(item),
    })
}
