//! Memory-backed datastore for tests, fixtures and the CLI's `--fixture`
//! mode.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::Datastore;
use crate::error::{DbError, Result};
use crate::query::{CompareOp, Condition, ReadQuery, Row};

/// In-process datastore.
///
/// Tables spring into existence on first insert. Filtering follows the
/// PostgREST semantics the REST backend gets: comparisons against NULL never
/// match, LIKE is case-insensitive, and NULLs sort last ascending and first
/// descending. An `id` column, when present, must be unique per table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a `{"table": [row, ...]}` document.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the document has another shape.
    pub fn from_json(document: Value) -> Result<Self> {
        let tables: HashMap<String, Vec<Row>> = serde_json::from_value(document)?;
        let tables = tables
            .into_iter()
            .map(|(name, rows)| (name.to_lowercase(), rows))
            .collect();
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Snapshot of a table's rows in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }
}

/// A condition with its LIKE pattern compiled.
struct Matcher<'a> {
    condition: &'a Condition,
    pattern: Option<Regex>,
}

impl<'a> Matcher<'a> {
    fn compile(conditions: &'a [Condition]) -> Result<Vec<Self>> {
        conditions
            .iter()
            .map(|condition| -> Result<Self> {
                let pattern = match (condition.op, &condition.value) {
                    (CompareOp::ILike, Value::String(p)) => Some(like_to_regex(p)?),
                    (CompareOp::ILike, Value::Null) => None,
                    (CompareOp::ILike, other) => Some(like_to_regex(&scalar_text(other))?),
                    _ => None,
                };
                Ok(Self { condition, pattern })
            })
            .collect()
    }

    fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.condition.column).unwrap_or(&Value::Null);
        let target = &self.condition.value;
        match self.condition.op {
            CompareOp::IsNull => cell.is_null(),
            CompareOp::IsNotNull => !cell.is_null(),
            CompareOp::ILike => {
                !cell.is_null()
                    && self
                        .pattern
                        .as_ref()
                        .is_some_and(|re| re.is_match(&scalar_text(cell)))
            }
            op => compare(cell, target).is_some_and(|ord| match op {
                CompareOp::Eq => ord == Ordering::Equal,
                CompareOp::Neq => ord != Ordering::Equal,
                CompareOp::Gt => ord == Ordering::Greater,
                CompareOp::Gte => ord != Ordering::Less,
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Lte => ord != Ordering::Greater,
                CompareOp::ILike | CompareOp::IsNull | CompareOp::IsNotNull => false,
            }),
        }
    }
}

fn matches_all(matchers: &[Matcher<'_>], row: &Row) -> bool {
    matchers.iter().all(|m| m.matches(row))
}

/// Translates a LIKE pattern into an anchored, case-insensitive regex.
/// `%` matches any run, `_` any one character, and `\` escapes the next one.
fn like_to_regex(pattern: &str) -> Result<Regex> {
    let mut re = String::from("(?is)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    re.push_str(&regex::escape(next.encode_utf8(&mut [0; 4])));
                }
            }
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| DbError::Datastore(format!("invalid LIKE pattern: {e}")))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Orders two cells. Numbers compare numerically, also against numeric
/// text; NULL and mismatched types are incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Number(x), Value::String(s)) => x.as_f64()?.partial_cmp(&s.trim().parse::<f64>().ok()?),
        (Value::String(s), Value::Number(y)) => s.trim().parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Sort key comparison with NULLs after every value.
fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

fn project(row: &Row, columns: Option<&[String]>) -> Row {
    match columns {
        None => row.clone(),
        Some(columns) => columns
            .iter()
            .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
            .collect(),
    }
}

fn require_conditions(operation: &'static str, table: &str, conditions: &[Condition]) -> Result<()> {
    if conditions.is_empty() {
        return Err(DbError::UnfilteredWrite {
            operation,
            table: table.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn select(&self, query: &ReadQuery) -> Result<Vec<Row>> {
        let matchers = Matcher::compile(&query.conditions)?;
        let mut rows: Vec<Row> = {
            let tables = self.tables.read();
            tables
                .get(&query.table)
                .map(|rows| {
                    rows.iter()
                        .filter(|row| matches_all(&matchers, row))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = sort_cmp(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.is_desc() {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        let offset = usize::try_from(query.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        Ok(rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, query.columns.as_deref()))
            .collect())
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Vec<Row>> {
        let mut tables = self.tables.write();
        let rows = tables.entry(table.to_string()).or_default();
        if let Some(id) = row.get("id").filter(|id| !id.is_null()) {
            let taken = rows
                .iter()
                .any(|r| r.get("id").and_then(|v| compare(v, id)) == Some(Ordering::Equal));
            if taken {
                return Err(DbError::Datastore(format!(
                    "duplicate key value violates unique constraint \"{table}_pkey\""
                )));
            }
        }
        debug!(table = %table, "memory insert");
        rows.push(row.clone());
        Ok(vec![row])
    }

    async fn update(&self, table: &str, values: Row, conditions: &[Condition]) -> Result<Vec<Row>> {
        require_conditions("update", table, conditions)?;
        let matchers = Matcher::compile(conditions)?;
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(vec![]);
        };
        let mut updated = vec![];
        for row in rows.iter_mut().filter(|row| matches_all(&matchers, row)) {
            for (column, value) in &values {
                row.insert(column.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, conditions: &[Condition]) -> Result<Vec<Row>> {
        require_conditions("delete", table, conditions)?;
        let matchers = Matcher::compile(conditions)?;
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(vec![]);
        };
        let (removed, kept): (Vec<Row>, Vec<Row>) = rows
            .drain(..)
            .partition(|row| matches_all(&matchers, row));
        *rows = kept;
        Ok(removed)
    }
}
