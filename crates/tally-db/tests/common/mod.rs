#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use tally_db::{Database, MemoryStore, Row};

/// A database over an empty in-memory store.
pub fn empty_db() -> Database {
    Database::from_store(MemoryStore::new())
}

/// A database seeded with a small personal-finance fixture.
pub fn seeded_db() -> Database {
    let store = MemoryStore::from_json(json!({
        "expenses": [
            {"id": "e1", "user_id": "u1", "category": "Food", "amount": 12.5, "date": 1_700_000_100_000_i64},
            {"id": "e2", "user_id": "u1", "category": "Rent", "amount": 900, "date": 1_700_000_500_000_i64},
            {"id": "e3", "user_id": "u1", "category": "Food", "amount": 30, "date": 1_699_999_000_000_i64},
            {"id": "e4", "user_id": "u2", "category": "Food", "amount": 8, "date": 1_700_000_900_000_i64},
            {"id": "e5", "user_id": "u1", "category": "Travel", "amount": 220, "date": 1_700_000_300_000_i64},
            {"id": "e6", "user_id": "u1", "category": "Food", "amount": 4.75, "date": 1_700_000_200_000_i64},
            {"id": "e7", "user_id": "u1", "category": "Health", "amount": 60, "date": 1_700_000_400_000_i64},
            {"id": "e8", "user_id": "u1", "category": "Food", "amount": 19, "date": 1_700_000_600_000_i64},
        ],
        "goals": [
            {"id": "g2", "user_id": "u1", "name": "Car", "target_amount": 10000, "current_amount": 2500},
        ],
    }))
    .unwrap_or_else(|e| panic!("Invalid fixture: {e}"));
    Database::from_store(store)
}

/// A store where two expenses have no owner, plus the store itself so
/// tests can inspect what is left.
pub fn ownerless_db() -> (Database, Arc<MemoryStore>) {
    let store = MemoryStore::from_json(json!({
        "expenses": [
            {"id": "x1", "user_id": null, "amount": 10},
            {"id": "x2", "user_id": null, "amount": 20},
            {"id": "x3", "user_id": "u1", "amount": 30},
        ],
    }))
    .unwrap_or_else(|e| panic!("Invalid fixture: {e}"));
    let store = Arc::new(store);
    (Database::new(store.clone()), store)
}

/// String field of a row.
pub fn field<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

/// `id` of each row, in order.
pub fn ids(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|r| field(r, "id").as_str().unwrap_or_default().to_string())
        .collect()
}
