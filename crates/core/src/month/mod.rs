//! Monthly ledger lifecycle.
//!
//! A month that is read for the first time is created from a template: the
//! expense categories of the closest earlier month, or a fixed default list.
//! Income sources are never carried over.

pub mod template;

pub use template::{ExpenseSnapshot, MonthTemplate, NewCategory, TemplateSource};
