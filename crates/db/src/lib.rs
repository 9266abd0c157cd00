//! Database layer for tabload.
//!
//! Resolves connection configuration and writes tables into PostgreSQL with
//! replace semantics.

pub mod config;
pub mod pool;
pub mod schema;
pub mod writer;

pub use config::{ConfigError, ConnectionDescriptor, ConnectionSource, DbEnv};
pub use pool::DbPool;
pub use writer::{TableWriter, WriteError};
