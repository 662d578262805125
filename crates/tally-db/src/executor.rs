//! Statement routing and execution.
//!
//! [`execute`] classifies a statement by its leading keyword, parses it,
//! binds its parameters and hands the resulting request to a [`Datastore`].

use serde::Serialize;
use tally_sql::ast::{DeleteStatement, InsertStatement, SelectStatement, UpdateStatement};
use tally_sql::{ParamQueue, Parser, SqlValue, Statement};
use tracing::{debug, error, warn};

use crate::bind::{bind_conditions, bind_row, bind_select};
use crate::error::Result;
use crate::query::{Condition, Row};
use crate::store::Datastore;

/// Outcome of one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    /// Rows read, or rows the datastore echoed back for a write.
    pub rows: Vec<Row>,
    /// Affected row count; always 0 for reads.
    pub changes: u64,
}

impl QueryResult {
    fn read(rows: Vec<Row>) -> Self {
        Self { rows, changes: 0 }
    }

    fn written(rows: Vec<Row>, changes: u64) -> Self {
        Self { rows, changes }
    }
}

/// Executes one statement.
///
/// Statements that do not start with SELECT, INSERT, UPDATE or DELETE (DDL,
/// PRAGMA, transaction control, empty text) are accepted and do nothing.
///
/// # Errors
///
/// Returns [`DbError::Parse`](crate::DbError::Parse) for malformed or
/// unsupported statements and passes datastore failures through.
pub async fn execute(
    store: &dyn Datastore,
    sql: &str,
    params: Vec<SqlValue>,
) -> Result<QueryResult> {
    if Parser::classify(sql).is_none() {
        debug!(sql = %sql, "Ignoring statement without a data keyword");
        return Ok(QueryResult::default());
    }

    let statement = Parser::new(sql).parse_statement().inspect_err(|e| {
        error!(sql = %sql, near = %e.span.slice(sql), error = %e, "Statement rejected");
    })?;

    let mut params = ParamQueue::new(params);
    let result = match &statement {
        Statement::Select(s) => run_select(store, s, &mut params).await,
        Statement::Insert(i) => run_insert(store, i, &mut params).await,
        Statement::Update(u) => run_update(store, u, &mut params).await,
        Statement::Delete(d) => run_delete(store, d, &mut params).await,
    };

    if params.missing() > 0 {
        warn!(
            sql = %sql,
            missing = params.missing(),
            "Too few parameters; unmatched placeholders bound NULL"
        );
    }
    if params.leftover() > 0 {
        debug!(sql = %sql, leftover = params.leftover(), "Unused parameters");
    }

    match result {
        Ok(result) => {
            debug!(
                kind = %statement.kind(),
                table = %statement.table(),
                filters = statement.predicate().len(),
                rows = result.rows.len(),
                changes = result.changes,
                "Statement executed"
            );
            Ok(result)
        }
        Err(e) => {
            error!(sql = %sql, error = %e, "Statement failed");
            Err(e)
        }
    }
}

/// A comparison bound to NULL can never hold, so the whole AND chain
/// selects nothing and the datastore is not asked.
fn matches_nothing(table: &str, conditions: &[Condition]) -> bool {
    let Some(condition) = conditions.iter().find(|c| c.never_matches()) else {
        return false;
    };
    debug!(
        table = %table,
        column = %condition.column,
        op = %condition.op,
        "Comparison against NULL matches no rows"
    );
    true
}

async fn run_select(
    store: &dyn Datastore,
    select: &SelectStatement,
    params: &mut ParamQueue,
) -> Result<QueryResult> {
    let query = bind_select(select, params)?;
    if matches_nothing(&query.table, &query.conditions) {
        return Ok(QueryResult::read(vec![]));
    }
    let rows = store.select(&query).await?;
    Ok(QueryResult::read(rows))
}

async fn run_insert(
    store: &dyn Datastore,
    insert: &InsertStatement,
    params: &mut ParamQueue,
) -> Result<QueryResult> {
    let row = bind_row(&insert.assignments(), params);
    let rows = store.insert(&insert.table, row).await?;
    Ok(QueryResult::written(rows, 1))
}

/// SET values are bound before the WHERE predicate.
async fn run_update(
    store: &dyn Datastore,
    update: &UpdateStatement,
    params: &mut ParamQueue,
) -> Result<QueryResult> {
    let values = bind_row(&update.assignments, params);
    let conditions = bind_conditions(&update.predicate, params);
    if matches_nothing(&update.table, &conditions) {
        return Ok(QueryResult::written(vec![], 0));
    }
    let rows = store.update(&update.table, values, &conditions).await?;
    let changes = rows.len() as u64;
    Ok(QueryResult::written(rows, changes))
}

async fn run_delete(
    store: &dyn Datastore,
    delete: &DeleteStatement,
    params: &mut ParamQueue,
) -> Result<QueryResult> {
    let conditions = bind_conditions(&delete.predicate, params);
    if matches_nothing(&delete.table, &conditions) {
        return Ok(QueryResult::written(vec![], 0));
    }
    let rows = store.delete(&delete.table, &conditions).await?;
    let changes = rows.len() as u64;
    Ok(QueryResult::written(rows, changes))
}
