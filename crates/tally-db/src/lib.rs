//! # tally-db
//!
//! Executes the tally SQL dialect against a REST datastore.
//!
//! Statements are parsed by `tally-sql`, bound to their positional
//! parameters, and translated into filtered reads and writes on a
//! [`Datastore`]. Callers use the prepared-statement facade:
//!
//! ```rust
//! use tally_db::{Database, MemoryStore};
//! use tally_sql::params;
//!
//! # tokio_test::block_on(async {
//! let db = Database::from_store(MemoryStore::new());
//! let stmt = db.prepare("SELECT * FROM expenses WHERE user_id = ? ORDER BY date DESC LIMIT 5");
//! let rows = stmt.all(params!["u1"]).await?;
//! assert!(rows.is_empty());
//! # Ok::<(), tally_db::DbError>(())
//! # }).unwrap();
//! ```

pub mod bind;
pub mod database;
pub mod error;
pub mod executor;
pub mod query;
pub mod store;

pub use database::{Database, PreparedStatement, RunResult};
pub use error::{DbError, Result};
pub use executor::{execute, QueryResult};
pub use query::{CompareOp, Condition, OrderBy, ReadQuery, Row};
pub use store::{Datastore, MemoryStore, RestConfig, RestStore};
