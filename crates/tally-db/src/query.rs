//! Datastore-facing request model.
//!
//! Statements are bound into these types before they reach a
//! [`Datastore`](crate::store::Datastore). Values are JSON because rows are.

use serde_json::Value;
use std::fmt;
use tally_sql::ast::{FilterOp, OrderDirection};

/// A datastore row.
pub type Row = serde_json::Map<String, Value>;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive LIKE.
    ILike,
    IsNull,
    IsNotNull,
}

impl CompareOp {
    /// PostgREST operator name.
    #[must_use]
    pub const fn postgrest_name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::ILike => "ilike",
            Self::IsNull => "is",
            Self::IsNotNull => "not.is",
        }
    }
}

impl From<FilterOp> for CompareOp {
    fn from(op: FilterOp) -> Self {
        match op {
            FilterOp::Eq => Self::Eq,
            FilterOp::Neq => Self::Neq,
            FilterOp::Like => Self::ILike,
            FilterOp::Gte => Self::Gte,
            FilterOp::Lte => Self::Lte,
            FilterOp::Gt => Self::Gt,
            FilterOp::Lt => Self::Lt,
            FilterOp::IsNull => Self::IsNull,
            FilterOp::IsNotNull => Self::IsNotNull,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.postgrest_name())
    }
}

/// One bound comparison. Conditions of a request are joined by AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    /// Ignored by the null checks.
    pub value: Value,
}

impl Condition {
    #[must_use]
    pub fn new(column: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }

    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Eq, value.into())
    }

    /// True when no row can satisfy this condition: a value comparison
    /// against NULL. `= NULL` is unknown in SQL, never true.
    #[must_use]
    pub fn never_matches(&self) -> bool {
        self.value.is_null() && !matches!(self.op, CompareOp::IsNull | CompareOp::IsNotNull)
    }
}

/// `ORDER BY` for a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }

    #[must_use]
    pub const fn is_desc(&self) -> bool {
        matches!(self.direction, OrderDirection::Desc)
    }
}

/// A filtered read: table, projection, conditions, ordering and paging.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReadQuery {
    pub table: String,
    /// `None` selects every column.
    pub columns: Option<Vec<String>>,
    pub conditions: Vec<Condition>,
    pub order: Option<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ReadQuery {
    /// Reads every row and column of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}
