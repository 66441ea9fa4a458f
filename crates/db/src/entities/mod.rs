//! `SeaORM` entity definitions.

pub mod prelude;

pub mod expense_categories;
pub mod income_sources;
pub mod monthly_data;
pub mod savings_goals;
pub mod sessions;
pub mod users;
