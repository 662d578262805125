//! Statement descriptors: the structured form of one parsed statement.

mod filter;
mod statement;

pub use filter::{Filter, FilterOp, Operand};
pub use statement::{
    Assignment, DeleteStatement, InsertStatement, OrderDirection, Ordering, Projection, RowBound,
    SelectStatement, Statement, StatementKind, UpdateStatement,
};
