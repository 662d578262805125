//! Tests for WHERE translation and for syntax outside the dialect.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use tally_sql::ast::{FilterOp, Operand};

#[test]
fn every_operator_form() {
    let s = parse_select(
        "SELECT * FROM t WHERE a IS NULL AND b IS NOT NULL AND c != ? AND d <> ? \
         AND e LIKE ? AND f >= ? AND g <= ? AND h > ? AND i < ? AND j = ?",
    );
    assert_eq!(
        s.predicate.iter().map(|f| f.op).collect::<Vec<_>>(),
        vec![
            FilterOp::IsNull,
            FilterOp::IsNotNull,
            FilterOp::Neq,
            FilterOp::Neq,
            FilterOp::Like,
            FilterOp::Gte,
            FilterOp::Lte,
            FilterOp::Gt,
            FilterOp::Lt,
            FilterOp::Eq,
        ]
    );
}

#[test]
fn one_filter_per_fragment_in_order() {
    let s = parse_select(
        "SELECT * FROM t WHERE a = ? AND b IS NULL AND c >= ? AND d LIKE ? AND e < ?",
    );
    assert_eq!(s.predicate.len(), 5);
    assert_eq!(
        s.predicate
            .iter()
            .map(tally_sql::ast::Filter::param_position)
            .collect::<Vec<_>>(),
        vec![Some(0), None, Some(1), Some(2), Some(3)]
    );
}

#[test]
fn null_checks_take_no_operand() {
    let s = parse_select("SELECT * FROM t WHERE deleted_at IS NULL");
    assert_eq!(s.predicate[0].operand, None);
}

#[test]
fn compound_operators_are_single_tokens() {
    let s = parse_select("SELECT * FROM t WHERE a>=? AND b<=? AND c<>?");
    assert_eq!(s.predicate[0].op, FilterOp::Gte);
    assert_eq!(s.predicate[1].op, FilterOp::Lte);
    assert_eq!(s.predicate[2].op, FilterOp::Neq);
    assert_eq!(s.predicate[2].operand, Some(Operand::Param(2)));
}

#[test]
fn or_is_refused() {
    assert_unsupported("SELECT * FROM t WHERE a = ? OR b = ?");
    assert_unsupported("SELECT * FROM t WHERE a = ? AND b = ? OR c = ?");
    assert_unsupported("DELETE FROM t WHERE a = ? OR b = ?");
}

#[test]
fn unsupported_constructs_are_refused() {
    assert_unsupported("SELECT * FROM t WHERE (a = ?)");
    assert_unsupported("SELECT * FROM t WHERE NOT a = ?");
    assert_unsupported("SELECT * FROM t WHERE a IN (?, ?)");
    assert_unsupported("SELECT * FROM t WHERE a BETWEEN ? AND ?");
    assert_unsupported("SELECT * FROM t WHERE a NOT LIKE ?");
    assert_unsupported("SELECT * FROM t WHERE LOWER(category) = ?");
    assert_unsupported("SELECT * FROM t WHERE a = b");
    assert_unsupported("SELECT SUM(amount) FROM expenses");
    assert_unsupported("SELECT category, amount FROM expenses GROUP BY category");
    assert_unsupported("SELECT DISTINCT category FROM expenses");
    assert_unsupported("SELECT * FROM expenses e JOIN budgets b");
    assert_unsupported("SELECT * FROM a, b");
    assert_unsupported("SELECT * FROM t ORDER BY a, b");
    assert_unsupported("SELECT t.a FROM t");
    assert_unsupported("INSERT INTO t (a) VALUES (?), (?)");
    assert_unsupported("INSERT INTO t (a) SELECT a FROM u");
}

#[test]
fn malformed_statements_report_position() {
    let err = parse_err("SELECT * FROM WHERE a = ?");
    assert_eq!(err.expected.as_deref(), Some("identifier"));
    assert_eq!(err.span.start, 14);

    let err = parse_err("SELECT * FROM t WHERE a ?");
    assert_eq!(err.expected.as_deref(), Some("comparison operator"));

    let err = parse_err("SELECT * FROM t LIMIT -1");
    assert_eq!(err.expected.as_deref(), Some("`?` or a non-negative integer"));
}

#[test]
fn lexer_errors_surface_as_parse_errors() {
    let err = parse_err("SELECT * FROM t WHERE name = 'unterminated");
    assert!(err.message.contains("invalid input"), "{err}");
}
