#![allow(dead_code)]

use serde_json::json;
use tally_db::{Database, MemoryStore};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// "Now" for every test: 2023-11-14T22:13:20Z.
pub const NOW: i64 = 1_700_000_000_000;

pub fn days_ago(days: i64) -> i64 {
    NOW - days * DAY_MS
}

/// Two users; `u1` has budgets, goals, income and expenses spread across
/// the 30-day window.
pub fn finance_db() -> Database {
    let store = MemoryStore::from_json(json!({
        "budgets": [
            {"id": "b1", "user_id": "u1", "category": "Food", "limit_amount": 100, "alert_threshold": 80,
             "spent_amount": 0, "created_at": days_ago(20)},
            {"id": "b2", "user_id": "u1", "category": "rent", "limit_amount": 1000, "alert_threshold": 90,
             "spent_amount": 0, "created_at": days_ago(10)},
            {"id": "b3", "user_id": "u2", "category": "Food", "limit_amount": 50, "alert_threshold": 80,
             "spent_amount": 0, "created_at": days_ago(5)},
        ],
        "expenses": [
            {"id": "e1", "user_id": "u1", "category": "food", "amount": 60, "date": days_ago(2)},
            {"id": "e2", "user_id": "u1", "category": "Food", "amount": 55, "date": days_ago(12)},
            {"id": "e3", "user_id": "u1", "category": "Food", "amount": 500, "date": days_ago(45)},
            {"id": "e4", "user_id": "u1", "category": "Rent", "amount": 950, "date": days_ago(3)},
            {"id": "e5", "user_id": "u1", "category": "Fun", "amount": 35, "date": days_ago(1)},
            {"id": "e6", "user_id": "u2", "category": "Food", "amount": 20, "date": days_ago(1)},
            {"id": "e7", "user_id": "u1", "category": "Foodie", "amount": 5, "date": days_ago(1)},
        ],
        "income": [
            {"id": "i1", "user_id": "u1", "source": "Salary", "amount": 2000, "date": days_ago(15)},
            {"id": "i2", "user_id": "u1", "source": "Bonus", "amount": 9000, "date": days_ago(60)},
        ],
        "goals": [
            {"id": "g1", "user_id": "u1", "title": "Car", "status": "active",
             "target_amount": 10000, "current_amount": 2500, "deadline": NOW + 90 * DAY_MS},
            {"id": "g2", "user_id": "u1", "title": "Trip", "status": "active",
             "target_amount": 2000, "current_amount": 1500, "deadline": NOW + 30 * DAY_MS},
            {"id": "g3", "user_id": "u1", "title": "Old", "status": "active",
             "target_amount": 100, "current_amount": 100, "deadline": NOW - DAY_MS},
            {"id": "g4", "user_id": "u1", "title": "Done", "status": "completed",
             "target_amount": 100, "current_amount": 100, "deadline": NOW + DAY_MS},
        ],
    }))
    .unwrap_or_else(|e| panic!("Invalid fixture: {e}"));
    Database::from_store(store)
}
