//! qmap Engine - Orchestration layer
//!
//! Boundary-logged command functions over any `EntityStore`, the
//! `ViewState` command handlers used by a presentation layer, and the
//! TOML configuration that wires them to a store.

pub mod commands;
pub mod config;

pub use commands::view::ViewState;
pub use config::QmapConfig;
