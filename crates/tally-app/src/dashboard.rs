//! Dashboard summary: totals, category breakdown, budget status, goal
//! progress and a financial health score over the last 30 days.
//!
//! All reads run concurrently and aggregation happens here, since the
//! query dialect has no GROUP BY or aggregate functions.

use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use tally_db::{Database, DbError, Result, Row};
use tally_sql::params;
use tracing::debug;

use crate::budgets::{live_spend, SPEND_WINDOW_MS};
use crate::rows::{number, raw, sum, text};

/// Number of categories and goals the summary lists.
const TOP_N: usize = 5;

/// Severity of the primary insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Success,
    Info,
}

/// The one message the dashboard leads with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_expenses: f64,
    pub total_income: f64,
    pub balance: f64,
    pub period: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Option<String>,
    pub amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: Option<String>,
    pub spent: f64,
    pub limit: f64,
    pub threshold: Value,
}

impl BudgetStatus {
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub id: Value,
    pub title: Value,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Value,
    /// Percent of target reached, rounded.
    pub progress: i64,
}

impl GoalProgress {
    fn from_row(row: &Row) -> Self {
        let target_amount = number(row, "target_amount");
        let current_amount = number(row, "current_amount");
        Self {
            id: raw(row, "id"),
            title: raw(row, "title"),
            target_amount,
            current_amount,
            deadline: raw(row, "deadline"),
            progress: round(completion(current_amount, target_amount) * 100.0),
        }
    }

    fn completion(&self) -> f64 {
        completion(self.current_amount, self.target_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub health_score: i64,
    pub primary_insight: Insight,
    pub summary: Totals,
    pub top_expense_categories: Vec<CategoryTotal>,
    pub budget_status: Vec<BudgetStatus>,
    pub upcoming_goals: Vec<GoalProgress>,
}

/// Builds the dashboard for `user_id` as of `now_ms`.
///
/// # Errors
///
/// Fails if any of the underlying reads fails.
pub async fn dashboard_summary(db: &Database, user_id: &str, now_ms: i64) -> Result<DashboardSummary> {
    let since = now_ms - SPEND_WINDOW_MS;

    let expenses = db.prepare("SELECT category, amount FROM expenses WHERE user_id = ? AND date >= ?");
    let income = db.prepare("SELECT amount FROM income WHERE user_id = ? AND date >= ?");
    let budgets = db.prepare(
        "SELECT id, category, limit_amount, alert_threshold FROM budgets \
         WHERE user_id = ? ORDER BY created_at DESC",
    );
    let goals = db.prepare(
        "SELECT * FROM goals WHERE user_id = ? AND status = 'active' AND deadline > ? \
         ORDER BY deadline ASC LIMIT 5",
    );

    let (expenses, income, budgets, goals) = futures::try_join!(
        expenses.all(params![user_id, since]),
        income.all(params![user_id, since]),
        budgets.all(params![user_id]),
        goals.all(params![user_id, now_ms])
    )?;
    debug!(
        user_id = %user_id,
        expenses = expenses.len(),
        income = income.len(),
        budgets = budgets.len(),
        goals = goals.len(),
        "Dashboard reads complete"
    );

    let budget_status = try_join_all(budgets.iter().map(|budget| async move {
        let category = text(budget, "category").map(ToString::to_string);
        let spent = match &category {
            Some(category) => live_spend(db, user_id, category, since).await?,
            None => 0.0,
        };
        Ok::<_, DbError>(BudgetStatus {
            category,
            spent,
            limit: number(budget, "limit_amount"),
            threshold: raw(budget, "alert_threshold"),
        })
    }))
    .await?;

    let total_expenses = sum(&expenses, "amount");
    let total_income = sum(&income, "amount");
    let upcoming_goals: Vec<GoalProgress> = goals.iter().map(GoalProgress::from_row).collect();

    let ratio = savings_ratio(total_income, total_expenses);
    let health_score = health_score(
        savings_score(ratio),
        budget_score(&budget_status),
        goal_score(&upcoming_goals),
    );

    Ok(DashboardSummary {
        health_score,
        primary_insight: primary_insight(&budget_status, ratio),
        summary: Totals {
            total_expenses,
            total_income,
            balance: total_income - total_expenses,
            period: "last_30_days",
        },
        top_expense_categories: top_categories(&expenses),
        budget_status,
        upcoming_goals,
    })
}

/// Share of income left after expenses; 0 without income.
#[must_use]
pub fn savings_ratio(income: f64, expenses: f64) -> f64 {
    if income > 0.0 {
        (income - expenses) / income
    } else {
        0.0
    }
}

#[must_use]
pub fn savings_score(ratio: f64) -> f64 {
    (ratio * 100.0).clamp(0.0, 100.0)
}

/// Percent of budgets within their limit; 80 with no budgets.
#[must_use]
pub fn budget_score(budgets: &[BudgetStatus]) -> f64 {
    if budgets.is_empty() {
        return 80.0;
    }
    let clean = budgets.iter().filter(|b| !b.is_over()).count();
    ratio_of(clean, budgets.len()) * 100.0
}

/// Mean goal completion in percent; 50 with no goals.
#[must_use]
pub fn goal_score(goals: &[GoalProgress]) -> f64 {
    if goals.is_empty() {
        return 50.0;
    }
    let total: f64 = goals.iter().map(GoalProgress::completion).sum();
    total / count_f64(goals.len()) * 100.0
}

/// Weighted blend: 40% savings, 30% budgets, 30% goals.
#[must_use]
pub fn health_score(savings: f64, budget: f64, goal: f64) -> i64 {
    round(0.3f64.mul_add(goal, 0.4f64.mul_add(savings, 0.3 * budget)))
}

#[must_use]
pub fn primary_insight(budgets: &[BudgetStatus], savings_ratio: f64) -> Insight {
    if let Some(over) = budgets.iter().find(|b| b.is_over()) {
        return Insight {
            title: "Budget Alert Detected".to_string(),
            description: format!(
                "You have exceeded your {} budget limit.",
                over.category.as_deref().unwrap_or("uncategorized")
            ),
            severity: Severity::Warning,
        };
    }
    if savings_ratio > 0.2 {
        return Insight {
            title: "Wealth Growth Positive".to_string(),
            description: "Your savings rate is above 20% this month. Good job building security!"
                .to_string(),
            severity: Severity::Success,
        };
    }
    Insight {
        title: "Steady Progress".to_string(),
        description: "Continue tracking your expenses to build long-term wealth.".to_string(),
        severity: Severity::Info,
    }
}

/// Groups expenses by category, largest total first, keeping five.
/// Ties keep first-seen order.
#[must_use]
pub fn top_categories(expenses: &[Row]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for row in expenses {
        let category = text(row, "category").map(ToString::to_string);
        let amount = number(row, "amount");
        match totals.iter_mut().find(|t| t.category == category) {
            Some(total) => {
                total.amount += amount;
                total.count += 1;
            }
            None => totals.push(CategoryTotal {
                category,
                amount,
                count: 1,
            }),
        }
    }
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals.truncate(TOP_N);
    totals
}

fn completion(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        current / target
    } else {
        0.0
    }
}

#[allow(clippy::cast_precision_loss)]
const fn count_f64(n: usize) -> f64 {
    n as f64
}

fn ratio_of(part: usize, whole: usize) -> f64 {
    count_f64(part) / count_f64(whole)
}

#[allow(clippy::cast_possible_truncation)]
fn round(x: f64) -> i64 {
    x.round() as i64
}
