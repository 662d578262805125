#![allow(dead_code)]

use tally_sql::ast::{
    DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement,
};
use tally_sql::{ParseError, Parser};

pub fn parse(sql: &str) -> Statement {
    Parser::new(sql)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Rendering a parsed statement and parsing it again must give back the
/// same rendering.
pub fn round_trip(sql: &str) {
    let first = parse(sql).to_string();
    let second = parse(&first).to_string();
    assert_eq!(
        first, second,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {first}\n  Second:   {second}"
    );
}

/// Asserts that `sql` is refused as unsupported syntax.
pub fn assert_unsupported(sql: &str) {
    let err = parse_err(sql);
    assert!(
        err.message.starts_with("unsupported syntax"),
        "Expected unsupported-syntax error for {sql}, got: {err}"
    );
}
