//! Tests for INSERT, UPDATE and DELETE parsing.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use tally_sql::ast::{Assignment, Filter, FilterOp, Operand};
use tally_sql::SqlValue;

#[test]
fn insert_columns_zip_with_values() {
    let i = parse_insert(
        "INSERT INTO budgets (id, user_id, category, limit_amount) VALUES (?, ?, ?, ?)",
    );
    assert_eq!(i.table, "budgets");
    assert_eq!(i.columns, vec!["id", "user_id", "category", "limit_amount"]);
    assert_eq!(
        i.values,
        (0..4).map(Operand::Param).collect::<Vec<_>>()
    );
}

#[test]
fn insert_missing_values_pad_with_null() {
    let i = parse_insert("INSERT INTO goals (id, name, target) VALUES (?, 'Car')");
    assert_eq!(
        i.assignments(),
        vec![
            Assignment {
                column: "id".to_string(),
                value: Operand::Param(0),
            },
            Assignment {
                column: "name".to_string(),
                value: Operand::Literal(SqlValue::Text("Car".to_string())),
            },
            Assignment {
                column: "target".to_string(),
                value: Operand::Literal(SqlValue::Null),
            },
        ]
    );
}

#[test]
fn insert_more_values_than_columns_fails() {
    let err = parse_err("INSERT INTO goals (id) VALUES (?, ?)");
    assert!(err.message.contains("1 columns but 2 values"), "{err}");
}

#[test]
fn update_set_before_where() {
    let u = parse_update("UPDATE budgets SET limit_amount = ?, category = ? WHERE id = ?");
    assert_eq!(
        u.assignments
            .iter()
            .map(|a| (a.column.as_str(), a.value.clone()))
            .collect::<Vec<_>>(),
        vec![
            ("limit_amount", Operand::Param(0)),
            ("category", Operand::Param(1)),
        ]
    );
    assert_eq!(
        u.predicate,
        vec![Filter::compare("id", FilterOp::Eq, Operand::Param(2))]
    );
}

#[test]
fn update_with_literal_assignment() {
    let u = parse_update("UPDATE goals SET completed = 1, note = NULL WHERE id = ? AND user_id = ?");
    assert_eq!(u.assignments[0].value, Operand::Literal(SqlValue::Int(1)));
    assert_eq!(u.assignments[1].value, Operand::Literal(SqlValue::Null));
    assert_eq!(u.predicate[0].param_position(), Some(0));
    assert_eq!(u.predicate[1].param_position(), Some(1));
}

#[test]
fn delete_by_id() {
    let d = parse_delete("DELETE FROM goals WHERE id = ?");
    assert_eq!(d.table, "goals");
    assert_eq!(
        d.predicate,
        vec![Filter::compare("id", FilterOp::Eq, Operand::Param(0))]
    );
}

#[test]
fn writes_without_where_are_refused() {
    assert!(parse_err("DELETE FROM goals").message.contains("without WHERE"));
    assert!(parse_err("UPDATE goals SET name = ?;").message.contains("without WHERE"));
}

#[test]
fn rendering_is_a_fixed_point() {
    round_trip("INSERT INTO budgets (id, user_id, category, limit_amount) VALUES (?, ?, 'Food', 500)");
    round_trip("UPDATE budgets SET limit_amount = ? WHERE id = ? AND user_id = ?");
    round_trip("DELETE FROM goals WHERE id = ?");
}
