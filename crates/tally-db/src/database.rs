//! Prepared-statement facade.

use std::sync::Arc;

use tally_sql::SqlValue;
use tracing::debug;

use crate::error::Result;
use crate::executor::execute;
use crate::query::Row;
use crate::store::Datastore;

/// Handle the application talks to.
///
/// Wraps a shared datastore; cloning is cheap and clones share it.
///
/// # Example
///
/// ```rust
/// use tally_db::{Database, MemoryStore};
/// use tally_sql::params;
///
/// # tokio_test::block_on(async {
/// let db = Database::from_store(MemoryStore::new());
/// db.prepare("INSERT INTO budgets (id, user_id, category) VALUES (?, ?, ?)")
///     .run(params!["b1", "u1", "Food"])
///     .await?;
///
/// let row = db
///     .prepare("SELECT * FROM budgets WHERE id = ?")
///     .get(params!["b1"])
///     .await?;
/// assert_eq!(row.unwrap()["category"], "Food");
/// # Ok::<(), tally_db::DbError>(())
/// # }).unwrap();
/// ```
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn Datastore>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Database")
    }
}

impl Database {
    #[must_use]
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn from_store<S: Datastore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// Wraps `sql` for repeated execution. Parsing happens on each call.
    #[must_use]
    pub fn prepare(&self, sql: impl Into<String>) -> PreparedStatement {
        PreparedStatement {
            store: Arc::clone(&self.store),
            sql: sql.into(),
        }
    }

    /// Accepts schema scripts; the schema is managed outside the application.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn exec(&self, sql: &str) -> Result<()> {
        debug!(sql = %sql, "exec ignored");
        Ok(())
    }

    /// Accepts connection pragmas, which the datastore has no use for.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn pragma(&self, pragma: &str) -> Result<()> {
        debug!(pragma = %pragma, "pragma ignored");
        Ok(())
    }

    /// Connections are pooled by the datastore client; nothing to close.
    pub const fn close(&self) {}
}

/// Outcome of [`PreparedStatement::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunResult {
    pub changes: u64,
}

/// A statement bound to a database, executed with fresh parameters per call.
#[derive(Clone)]
pub struct PreparedStatement {
    store: Arc<dyn Datastore>,
    sql: String,
}

impl std::fmt::Debug for PreparedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.sql)
            .finish_non_exhaustive()
    }
}

impl PreparedStatement {
    /// Executes a write and reports how many rows it touched.
    ///
    /// # Errors
    ///
    /// See [`execute`].
    pub async fn run(&self, params: Vec<SqlValue>) -> Result<RunResult> {
        let result = execute(self.store.as_ref(), &self.sql, params).await?;
        Ok(RunResult {
            changes: result.changes,
        })
    }

    /// First row of the result, if any.
    ///
    /// # Errors
    ///
    /// See [`execute`].
    pub async fn get(&self, params: Vec<SqlValue>) -> Result<Option<Row>> {
        let result = execute(self.store.as_ref(), &self.sql, params).await?;
        Ok(result.rows.into_iter().next())
    }

    /// Every row of the result.
    ///
    /// # Errors
    ///
    /// See [`execute`].
    pub async fn all(&self, params: Vec<SqlValue>) -> Result<Vec<Row>> {
        let result = execute(self.store.as_ref(), &self.sql, params).await?;
        Ok(result.rows)
    }
}
