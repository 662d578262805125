//! Statement descriptors produced by the parser.

use std::fmt;

use super::filter::{Filter, Operand};
use crate::value::SqlValue;

/// Which of the four supported statements a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Leading keyword of the statement.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction. Ascending unless `DESC` is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    /// SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `ORDER BY column [ASC|DESC]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub column: String,
    pub direction: OrderDirection,
}

/// A LIMIT or OFFSET value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBound {
    /// Written inline.
    Fixed(u64),
    /// Taken from the placeholder at this position.
    Param(usize),
}

impl fmt::Display for RowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Param(_) => f.write_str("?"),
        }
    }
}

/// Columns a SELECT returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`
    All,
    /// Explicit, lower-cased column names in written order.
    Columns(Vec<String>),
}

/// A parsed SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    pub projection: Projection,
    pub predicate: Vec<Filter>,
    pub ordering: Option<Ordering>,
    pub limit: Option<RowBound>,
    pub offset: Option<RowBound>,
}

/// `column = operand` inside SET, or one column/value pair of an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Operand,
}

/// A parsed single-row INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    /// VALUES entries; may be shorter than `columns`.
    pub values: Vec<Operand>,
}

impl InsertStatement {
    /// Pairs each column with its VALUES entry in order. Columns with no
    /// entry are paired with NULL.
    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| Assignment {
                column: column.clone(),
                value: self
                    .values
                    .get(i)
                    .cloned()
                    .unwrap_or(Operand::Literal(SqlValue::Null)),
            })
            .collect()
    }
}

/// A parsed UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<Assignment>,
    pub predicate: Vec<Filter>,
}

/// A parsed DELETE.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub predicate: Vec<Filter>,
}

/// One classified, parsed statement. Built per call and never shared.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self {
            Self::Select(_) => StatementKind::Select,
            Self::Insert(_) => StatementKind::Insert,
            Self::Update(_) => StatementKind::Update,
            Self::Delete(_) => StatementKind::Delete,
        }
    }

    /// Lower-cased target table.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Select(s) => &s.table,
            Self::Insert(i) => &i.table,
            Self::Update(u) => &u.table,
            Self::Delete(d) => &d.table,
        }
    }

    /// The WHERE filters; empty for INSERT.
    #[must_use]
    pub fn predicate(&self) -> &[Filter] {
        match self {
            Self::Select(s) => &s.predicate,
            Self::Insert(_) => &[],
            Self::Update(u) => &u.predicate,
            Self::Delete(d) => &d.predicate,
        }
    }
}

fn write_predicate(f: &mut fmt::Formatter<'_>, predicate: &[Filter]) -> fmt::Result {
    for (i, filter) in predicate.iter().enumerate() {
        f.write_str(if i == 0 { " WHERE " } else { " AND " })?;
        write!(f, "{filter}")?;
    }
    Ok(())
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(s) => {
                let cols = match &s.projection {
                    Projection::All => String::from("*"),
                    Projection::Columns(cols) => cols.join(", "),
                };
                write!(f, "SELECT {cols} FROM {}", s.table)?;
                write_predicate(f, &s.predicate)?;
                if let Some(order) = &s.ordering {
                    write!(f, " ORDER BY {} {}", order.column, order.direction.as_str())?;
                }
                if let Some(limit) = &s.limit {
                    write!(f, " LIMIT {limit}")?;
                }
                if let Some(offset) = &s.offset {
                    write!(f, " OFFSET {offset}")?;
                }
                Ok(())
            }
            Self::Insert(i) => write!(
                f,
                "INSERT INTO {} ({}) VALUES ({})",
                i.table,
                i.columns.join(", "),
                join(&i.values)
            ),
            Self::Update(u) => {
                let sets: Vec<String> = u
                    .assignments
                    .iter()
                    .map(|a| format!("{} = {}", a.column, a.value))
                    .collect();
                write!(f, "UPDATE {} SET {}", u.table, sets.join(", "))?;
                write_predicate(f, &u.predicate)
            }
            Self::Delete(d) => {
                write!(f, "DELETE FROM {}", d.table)?;
                write_predicate(f, &d.predicate)
            }
        }
    }
}
