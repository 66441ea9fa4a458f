//! Entity prelude.

pub use super::expense_categories::Entity as ExpenseCategories;
pub use super::income_sources::Entity as IncomeSources;
pub use super::monthly_data::Entity as MonthlyData;
pub use super::savings_goals::Entity as SavingsGoals;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
