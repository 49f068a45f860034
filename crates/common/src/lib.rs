//! Sakila Common Library
//!
//! Shared code for the Sakila rental API:
//! - Configuration management
//! - Error types and their HTTP mapping
//! - Database pool, typed row models and the repository
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
