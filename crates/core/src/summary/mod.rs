//! Yearly aggregation of monthly ledgers.
//!
//! Pure reduction over the months of one year: per-month income, spend and
//! savings, year totals with the savings rate, a per-category breakdown and
//! a few highlights for the dashboard.

pub mod error;
pub mod service;
pub mod types;


pub use error::SummaryError;
pub use service::SummaryService;
pub use types::{
    CategoryHighlight, CategoryTotal, ExpenseLine, Highlights, IncomeLine, MonthHighlight,
    MonthLedger, MonthSummary, YearTotals, YearlySummary,
};
