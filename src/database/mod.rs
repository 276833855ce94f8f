//! # Database Module
//!
//! Persistence for users and contacts: the [`Store`] seam, a Postgres
//! implementation on tokio-postgres + deadpool, an in-memory implementation,
//! connection management and migrations.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod postgres;
pub mod store;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;
