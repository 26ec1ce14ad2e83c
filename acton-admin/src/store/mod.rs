//! Backing store access
//!
//! The admin handlers talk to the database only through [`AdminStore`]. Each
//! operation is one auto-committed statement; there are no transactions and no
//! retries. Table and column names always come from registered schemas, never
//! from request input.
//!
//! [`SqliteStore`] and [`PostgresStore`] implement the trait over `sqlx` pools.

mod sql;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::coerce::Change;
use crate::error::AdminError;
use crate::model::{FieldDef, FieldValue};

#[cfg(feature = "postgres")]
pub use sql::{connect_postgres, PostgresStore};
#[cfg(feature = "sqlite")]
pub use sql::{connect_sqlite, SqliteStore};

/// One fetched row: values aligned with the requested fields
pub type Record = Vec<FieldValue>;

/// How a record is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteMode {
    /// `DELETE` the row
    Hard,
    /// Mark the row deleted by setting a timestamp column
    Soft {
        /// Marker column (`deleted_at`)
        column: String,
        /// Deletion time
        at: NaiveDateTime,
    },
}

/// Storage operations used by the admin handlers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Read every row of `table`, selecting the columns of `fields` in order
    async fn fetch_all(&self, table: &str, fields: &[FieldDef]) -> Result<Vec<Record>, AdminError>;

    /// Apply `changes` to the row matching `key`, returning rows affected
    async fn update(&self, table: &str, key: &Change, changes: &[Change]) -> Result<u64, AdminError>;

    /// Remove the row matching `key`, returning rows affected
    async fn delete(&self, table: &str, key: &Change, mode: &DeleteMode) -> Result<u64, AdminError>;
}
