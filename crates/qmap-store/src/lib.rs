//! qmap Store - SQLite persistence for qualitative maps
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - `SqliteStore`, an `EntityStore` backed by a single connection

pub mod db;
pub mod errors;
pub mod migrations;
pub mod sqlite_store;

pub use sqlite_store::SqliteStore;
