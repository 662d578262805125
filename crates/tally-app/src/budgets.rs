//! Budgets with spend computed from recent expenses.

use futures::future::try_join_all;
use serde_json::json;
use tally_db::{Database, DbError, Result, Row};
use tally_sql::params;
use tracing::debug;

use crate::rows::{escape_like, sum, text};

/// Look-back window for spend, in milliseconds.
pub const SPEND_WINDOW_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Total expense amount for `user_id` in `category` since `since_ms`.
///
/// Categories match case-insensitively.
///
/// # Errors
///
/// Propagates datastore failures.
pub async fn live_spend(db: &Database, user_id: &str, category: &str, since_ms: i64) -> Result<f64> {
    let rows = db
        .prepare("SELECT amount FROM expenses WHERE user_id = ? AND category LIKE ? AND date >= ?")
        .all(params![user_id, escape_like(category), since_ms])
        .await?;
    Ok(sum(&rows, "amount"))
}

/// Lists a user's budgets, newest first, with `spent_amount` replaced by
/// the spend of the last 30 days.
///
/// Spend is read concurrently for every budget; any failed read fails the
/// whole listing.
///
/// # Errors
///
/// Propagates datastore failures.
pub async fn budgets_with_live_spend(db: &Database, user_id: &str, now_ms: i64) -> Result<Vec<Row>> {
    let since = now_ms - SPEND_WINDOW_MS;
    let budgets = db
        .prepare("SELECT * FROM budgets WHERE user_id = ? ORDER BY created_at DESC")
        .all(params![user_id])
        .await?;
    debug!(user_id = %user_id, budgets = budgets.len(), "Computing live spend");

    try_join_all(budgets.into_iter().map(|mut budget| async move {
        let spent = match text(&budget, "category") {
            Some(category) => live_spend(db, user_id, category, since).await?,
            None => 0.0,
        };
        budget.insert("spent_amount".to_string(), json!(spent));
        Ok::<_, DbError>(budget)
    }))
    .await
}
