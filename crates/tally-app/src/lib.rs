//! # tally-app
//!
//! Aggregation services of the personal-finance backend, written against
//! the `tally-db` prepared-statement facade:
//!
//! - [`budgets::budgets_with_live_spend`] lists budgets with their spend
//!   over the last 30 days.
//! - [`dashboard::dashboard_summary`] combines expenses, income, budgets and
//!   goals into totals and a financial health score.

pub mod budgets;
pub mod dashboard;
mod rows;

pub use budgets::{budgets_with_live_spend, live_spend, SPEND_WINDOW_MS};
pub use dashboard::{dashboard_summary, DashboardSummary};

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
