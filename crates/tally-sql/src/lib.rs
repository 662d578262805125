//! # tally-sql
//!
//! Lexer and parser for the small SQL dialect the personal-finance
//! application speaks.
//!
//! The dialect covers single-table SELECT, single-row INSERT, UPDATE and
//! DELETE with `?` placeholders, AND-joined comparisons, one ORDER BY
//! column, LIMIT and OFFSET. Anything else (OR, parentheses, joins,
//! grouping, function calls) is refused with a [`ParseError`] rather than
//! quietly ignored.
//!
//! ```rust
//! use tally_sql::ast::{FilterOp, Operand, Statement};
//! use tally_sql::Parser;
//!
//! let stmt = Parser::new("SELECT * FROM expenses WHERE user_id = ? AND amount >= 10")
//!     .parse_statement()
//!     .unwrap();
//!
//! let Statement::Select(select) = stmt else { unreachable!() };
//! assert_eq!(select.table, "expenses");
//! assert_eq!(select.predicate[0].operand, Some(Operand::Param(0)));
//! assert_eq!(select.predicate[1].op, FilterOp::Gte);
//! ```

pub mod ast;
pub mod lexer;
pub mod params;
pub mod parser;
pub mod value;

pub use ast::{Statement, StatementKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use params::ParamQueue;
pub use parser::{ParseError, Parser};
pub use value::{SqlValue, ToSqlValue};
