//! WHERE-clause comparisons.

use std::fmt;

use crate::value::SqlValue;

/// The right-hand side of a comparison, assignment, or VALUES entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A `?` placeholder; holds its 0-based position among all placeholders
    /// of the statement, counted in textual order.
    Param(usize),
    /// A value written inline.
    Literal(SqlValue),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(_) => f.write_str("?"),
            Self::Literal(v) => f.write_str(&v.to_sql_inline()),
        }
    }
}

/// Comparison operators a filter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `!=` / `<>`
    Neq,
    /// `LIKE`, evaluated case-insensitively.
    Like,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl FilterOp {
    /// True for the two null checks, which take no operand.
    #[must_use]
    pub const fn is_null_check(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// SQL spelling of the operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Like => "LIKE",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }
}

/// One `column <op> operand` comparison. Filters of a predicate are joined
/// by AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Lower-cased column name.
    pub column: String,
    /// Comparison.
    pub op: FilterOp,
    /// Right-hand side; `None` exactly when `op` is a null check.
    pub operand: Option<Operand>,
}

impl Filter {
    /// Creates a comparison filter.
    #[must_use]
    pub fn compare(column: impl Into<String>, op: FilterOp, operand: Operand) -> Self {
        Self {
            column: column.into(),
            op,
            operand: Some(operand),
        }
    }

    /// Creates an `IS NULL` (or `IS NOT NULL` when `negated`) filter.
    #[must_use]
    pub fn null_check(column: impl Into<String>, negated: bool) -> Self {
        Self {
            column: column.into(),
            op: if negated {
                FilterOp::IsNotNull
            } else {
                FilterOp::IsNull
            },
            operand: None,
        }
    }

    /// Placeholder position consumed by this filter, if any.
    #[must_use]
    pub fn param_position(&self) -> Option<usize> {
        match self.operand {
            Some(Operand::Param(pos)) => Some(pos),
            _ => None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Some(operand) => write!(f, "{} {} {}", self.column, self.op.as_sql(), operand),
            None => write!(f, "{} {}", self.column, self.op.as_sql()),
        }
    }
}
