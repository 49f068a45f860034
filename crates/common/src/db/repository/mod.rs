//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations. Reads go
//! straight to the pool; every multi-statement write runs in one
//! transaction that commits only when all statements succeed.

mod catalog;
mod customers;
mod rentals;

use crate::db::DbPool;
use crate::errors::Result;
use sea_orm::{DbBackend, Statement, Value};

/// Staff member recorded on rentals opened through the API
pub const API_STAFF_ID: u8 = 1;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }
}

/// Build a MySQL statement with positional `?` placeholders
fn mysql<I>(sql: &str, values: I) -> Statement
where
    I: IntoIterator<Item = Value>,
{
    Statement::from_sql_and_values(DbBackend::MySql, sql, values)
}
