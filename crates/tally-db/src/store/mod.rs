//! Datastore backends.
//!
//! [`Datastore`] is the seam between statement execution and storage.
//! [`RestStore`] talks to a PostgREST endpoint; [`MemoryStore`] keeps rows in
//! process and backs tests and fixtures.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::{RestConfig, RestStore};

use async_trait::async_trait;

use crate::error::Result;
use crate::query::{Condition, ReadQuery, Row};

/// Storage operations statements are translated into.
///
/// Every write returns the rows it affected, so callers can count them.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Returns the rows matching `query`, ordered and paged.
    async fn select(&self, query: &ReadQuery) -> Result<Vec<Row>>;

    /// Creates one row and returns what was stored.
    async fn insert(&self, table: &str, row: Row) -> Result<Vec<Row>>;

    /// Sets `values` on every row matching all `conditions`.
    async fn update(&self, table: &str, values: Row, conditions: &[Condition]) -> Result<Vec<Row>>;

    /// Removes every row matching all `conditions`.
    async fn delete(&self, table: &str, conditions: &[Condition]) -> Result<Vec<Row>>;
}
