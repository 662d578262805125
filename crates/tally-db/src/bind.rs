//! Binding parsed statements and parameters into datastore requests.
//!
//! Every function here pops from the shared [`ParamQueue`], so calling
//! them in the order the clauses appear in the statement text is what
//! lines each `?` up with its value.

use tally_sql::ast::{Assignment, Filter, Operand, Projection, RowBound, SelectStatement};
use tally_sql::{ParamQueue, SqlValue};

use crate::error::{DbError, Result};
use crate::query::{CompareOp, Condition, OrderBy, ReadQuery, Row};

fn bind_operand(operand: &Operand, params: &mut ParamQueue) -> SqlValue {
    match operand {
        Operand::Param(_) => params.next_value(),
        Operand::Literal(value) => value.clone(),
    }
}

/// Binds a WHERE predicate.
pub fn bind_conditions(predicate: &[Filter], params: &mut ParamQueue) -> Vec<Condition> {
    predicate
        .iter()
        .map(|filter| {
            let value = filter
                .operand
                .as_ref()
                .map_or(SqlValue::Null, |operand| bind_operand(operand, params));
            Condition::new(filter.column.clone(), CompareOp::from(filter.op), value.to_json())
        })
        .collect()
}

/// Binds SET assignments or INSERT column/value pairs into a row.
pub fn bind_row(assignments: &[Assignment], params: &mut ParamQueue) -> Row {
    assignments
        .iter()
        .map(|a| (a.column.clone(), bind_operand(&a.value, params).to_json()))
        .collect()
}

fn bind_bound(
    bound: Option<RowBound>,
    clause: &str,
    params: &mut ParamQueue,
) -> Result<Option<u64>> {
    let value = match bound {
        None => return Ok(None),
        Some(RowBound::Fixed(n)) => return Ok(Some(n)),
        Some(RowBound::Param(_)) => params.next_value(),
    };
    let invalid = |message: String| DbError::InvalidParameter {
        context: clause.to_string(),
        message,
    };
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Int(n) => u64::try_from(n)
            .map(Some)
            .map_err(|_| invalid(format!("{n} is negative"))),
        SqlValue::Text(ref s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(format!("{s:?} is not a row count"))),
        other => Err(invalid(format!("{} is not a row count", other.to_sql_inline()))),
    }
}

/// Binds a SELECT: predicate, then LIMIT, then OFFSET.
///
/// # Errors
///
/// Returns [`DbError::InvalidParameter`] when a LIMIT or OFFSET placeholder
/// is bound to something other than a non-negative integer.
pub fn bind_select(select: &SelectStatement, params: &mut ParamQueue) -> Result<ReadQuery> {
    let conditions = bind_conditions(&select.predicate, params);
    let limit = bind_bound(select.limit, "LIMIT", params)?;
    let offset = bind_bound(select.offset, "OFFSET", params)?;
    Ok(ReadQuery {
        table: select.table.clone(),
        columns: match &select.projection {
            Projection::All => None,
            Projection::Columns(cols) => Some(cols.clone()),
        },
        conditions,
        order: select.ordering.as_ref().map(|o| OrderBy {
            column: o.column.clone(),
            direction: o.direction,
        }),
        limit,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tally_sql::ast::Statement;
    use tally_sql::{params, Parser};

    fn select(sql: &str) -> SelectStatement {
        match Parser::new(sql).parse_statement().unwrap() {
            Statement::Select(s) => s,
            other => panic!("Expected SELECT, got {other:?}"),
        }
    }

    #[test]
    fn test_select_binds_in_text_order() {
        let stmt = select("SELECT * FROM expenses WHERE user_id = ? AND kind = 'card' LIMIT ? OFFSET ?");
        let mut queue = ParamQueue::new(params!["u1", 5, 10]);
        let q = bind_select(&stmt, &mut queue).unwrap();
        assert_eq!(q.conditions[0], Condition::eq("user_id", "u1"));
        assert_eq!(q.conditions[1], Condition::eq("kind", "card"));
        assert_eq!((q.limit, q.offset), (Some(5), Some(10)));
        assert_eq!(queue.leftover(), 0);
    }

    #[test]
    fn test_exhausted_params_bind_null() {
        let stmt = select("SELECT * FROM goals WHERE id = ? AND user_id = ?");
        let mut queue = ParamQueue::new(params!["g1"]);
        let q = bind_select(&stmt, &mut queue).unwrap();
        assert_eq!(q.conditions[1], Condition::new("user_id", CompareOp::Eq, json!(null)));
        assert!(q.conditions[1].never_matches());
        assert_eq!(queue.missing(), 1);
    }

    #[test]
    fn test_limit_must_be_a_count() {
        let stmt = select("SELECT * FROM goals LIMIT ?");
        let err = bind_select(&stmt, &mut ParamQueue::new(params![-1])).unwrap_err();
        assert!(matches!(err, DbError::InvalidParameter { ref context, .. } if context == "LIMIT"));

        let q = bind_select(&stmt, &mut ParamQueue::new(params!["7"])).unwrap();
        assert_eq!(q.limit, Some(7));
    }

    #[test]
    fn test_bind_row() {
        let stmt = Parser::new("UPDATE t SET a = ?, b = 'x', c = ? WHERE id = ?")
            .parse_statement()
            .unwrap();
        let Statement::Update(update) = stmt else {
            panic!("Expected UPDATE");
        };
        let mut queue = ParamQueue::new(params![1, true, "id1"]);
        let row = bind_row(&update.assignments, &mut queue);
        assert_eq!(serde_json::Value::Object(row), json!({"a": 1, "b": "x", "c": true}));
        let conditions = bind_conditions(&update.predicate, &mut queue);
        assert_eq!(conditions, vec![Condition::eq("id", "id1")]);
    }
}
