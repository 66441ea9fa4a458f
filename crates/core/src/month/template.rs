//! Expense category templates for newly created months.

use tally_shared::Amount;

/// Default categories for the very first month: `(name, show_paid_status)`.
const DEFAULT_CATEGORIES: [(&str, bool); 5] = [
    ("Rent", true),
    ("Groceries", false),
    ("Car Insurance", true),
    ("Clothes", false),
    ("Other", false),
];

/// An expense category as stored in an existing month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseSnapshot {
    /// Category name.
    pub name: String,
    /// Budgeted amount.
    pub budgeted: Amount,
    /// Amount actually spent.
    pub actual: Amount,
    /// Whether the bill was marked paid.
    pub is_paid: bool,
    /// Whether the UI shows the paid toggle.
    pub show_paid_status: bool,
    /// Display order within the month.
    pub position: i32,
}

/// A category to insert into a new month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Category name.
    pub name: String,
    /// Budgeted amount.
    pub budgeted: Amount,
    /// Amount actually spent; always zero for a fresh month.
    pub actual: Amount,
    /// Paid flag; always false for a fresh month.
    pub is_paid: bool,
    /// Whether the UI shows the paid toggle.
    pub show_paid_status: bool,
    /// Display order within the month.
    pub position: i32,
}

impl NewCategory {
    fn fresh(name: String, budgeted: Amount, show_paid_status: bool, position: i32) -> Self {
        Self {
            name,
            budgeted,
            actual: Amount::ZERO,
            is_paid: false,
            show_paid_status,
            position,
        }
    }
}

/// Where a new month's categories came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// Copied from the closest earlier month.
    CarriedForward,
    /// Fixed default list.
    Defaults,
}

/// Categories a new month starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTemplate {
    /// Categories to insert, in display order.
    pub categories: Vec<NewCategory>,
    /// Origin of the categories.
    pub source: TemplateSource,
}

impl MonthTemplate {
    /// Builds the template for a month that does not exist yet.
    ///
    /// `prior` holds the expense categories of the closest earlier month, if
    /// any. Only the shape of a category is carried forward: name, budget,
    /// paid-toggle visibility and order. Actual spend and the paid flag start
    /// over. With no earlier categories the fixed default list is used.
    #[must_use]
    pub fn for_new_month(prior: Option<&[ExpenseSnapshot]>) -> Self {
        match prior {
            Some(categories) if !categories.is_empty() => Self {
                categories: categories
                    .iter()
                    .map(|c| {
                        NewCategory::fresh(
                            c.name.clone(),
                            c.budgeted,
                            c.show_paid_status,
                            c.position,
                        )
                    })
                    .collect(),
                source: TemplateSource::CarriedForward,
            },
            _ => Self::defaults(),
        }
    }

    /// The fixed default category list.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            categories: (0..)
                .zip(DEFAULT_CATEGORIES)
                .map(|(position, (name, show_paid_status))| {
                    NewCategory::fresh(name.to_string(), Amount::ZERO, show_paid_status, position)
                })
                .collect(),
            source: TemplateSource::Defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(name: &str, budgeted: Amount, actual: Amount, paid: bool, position: i32) -> ExpenseSnapshot {
        ExpenseSnapshot {
            name: name.to_string(),
            budgeted,
            actual,
            is_paid: paid,
            show_paid_status: paid,
            position,
        }
    }

    #[test]
    fn test_defaults_shape() {
        let template = MonthTemplate::for_new_month(None);
        assert_eq!(template.source, TemplateSource::Defaults);

        let names: Vec<_> = template.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["Rent", "Groceries", "Car Insurance", "Clothes", "Other"]
        );

        let toggles: Vec<_> = template
            .categories
            .iter()
            .map(|c| c.show_paid_status)
            .collect();
        assert_eq!(toggles, [true, false, true, false, false]);

        assert!(template.categories.iter().all(|c| c.budgeted.is_zero()
            && c.actual.is_zero()
            && !c.is_paid));
        let positions: Vec<_> = template.categories.iter().map(|c| c.position).collect();
        assert_eq!(positions, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_prior_falls_back_to_defaults() {
        let template = MonthTemplate::for_new_month(Some(&[]));
        assert_eq!(template.source, TemplateSource::Defaults);
        assert_eq!(template.categories.len(), 5);
    }

    #[test]
    fn test_carry_forward_resets_actuals() {
        let prior = vec![
            snapshot("Rent", Amount::new(dec!(1200)), Amount::new(dec!(1200)), true, 0),
            snapshot("Groceries", Amount::new(dec!(400)), Amount::new(dec!(380)), false, 1),
        ];

        let template = MonthTemplate::for_new_month(Some(&prior));
        assert_eq!(template.source, TemplateSource::CarriedForward);
        assert_eq!(
            template.categories,
            vec![
                NewCategory {
                    name: "Rent".to_string(),
                    budgeted: Amount::new(dec!(1200)),
                    actual: Amount::ZERO,
                    is_paid: false,
                    show_paid_status: true,
                    position: 0,
                },
                NewCategory {
                    name: "Groceries".to_string(),
                    budgeted: Amount::new(dec!(400)),
                    actual: Amount::ZERO,
                    is_paid: false,
                    show_paid_status: false,
                    position: 1,
                },
            ]
        );
    }

    #[test]
    fn test_carry_forward_keeps_custom_categories_and_order() {
        let prior = vec![
            snapshot("Gym", Amount::new(dec!(35)), Amount::new(dec!(35)), true, 3),
            snapshot("Internet", Amount::new(dec!(60)), Amount::ZERO, false, 7),
        ];

        let template = MonthTemplate::for_new_month(Some(&prior));
        let names: Vec<_> = template.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Gym", "Internet"]);
        assert_eq!(template.categories[1].position, 7);
    }
}
