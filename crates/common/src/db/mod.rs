//! Database layer for the Sakila API
//!
//! Provides:
//! - Typed row models decoded from raw SQL
//! - Repository pattern for data access
//! - Connection pool management and migrations
//! - The customer search predicate builder

pub mod models;
mod repository;
pub mod search;

pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, SqlxMySqlConnector,
    TransactionTrait,
};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use tracing::info;

/// Database connection pool wrapper
///
/// Every statement borrows a pooled connection for its own duration, and a
/// `DatabaseTransaction` pins one connection until it is committed or
/// dropped. Either way the connection goes back to the pool on every exit
/// path, including early `?` returns.
#[derive(Clone)]
pub struct DbPool {
    conn: Arc<DatabaseConnection>,

    /// Raw sqlx pool, kept for running migrations. Absent for mock connections.
    mysql: Option<MySqlPool>,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!(target_db = %config.display_target(), "Connecting to database...");

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect to {}: {}", config.display_target(), e),
            })?;

        info!("Database connection established");

        Ok(Self {
            conn: Arc::new(SqlxMySqlConnector::from_sqlx_mysql_pool(pool.clone())),
            mysql: Some(pool),
        })
    }

    /// Wrap an existing connection (used with `MockDatabase` in tests)
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self {
            conn: Arc::new(conn),
            mysql: None,
        }
    }

    /// Connection for single-statement work
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Open a transaction; it rolls back if dropped without `commit`
    pub async fn begin(&self) -> Result<DatabaseTransaction> {
        self.conn.begin().await.map_err(Into::into)
    }

    /// Apply the bundled migrations
    pub async fn migrate(&self) -> Result<()> {
        let Some(pool) = self.mysql.as_ref() else {
            tracing::warn!("No MySQL pool attached, skipping migrations");
            return Ok(());
        };

        sqlx::migrate!("../../migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::Internal {
                message: format!("Migration failed: {}", e),
            })?;

        info!("Migrations applied");
        Ok(())
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }
}
