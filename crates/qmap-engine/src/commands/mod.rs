//! Command orchestration layer.
//!
//! `catalog` exposes each store and algorithm operation with lifecycle
//! logging; `view` threads an explicit `ViewState` through the
//! presentation-level commands.

pub mod catalog;
pub mod view;
