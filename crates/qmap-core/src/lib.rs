//! qmap Core - qualitative map data model and consistency rules
//!
//! This crate provides the entities of a qualitative map and the algorithms
//! that keep them consistent:
//! - Model, Element, Layout and Position entities
//! - The `EntityStore` persistence seam and an in-memory implementation
//! - Cascade orchestration (a Model always comes with its default Layout)
//! - Layout resolution, render composition and element placement
//!
//! Persistence engines live in `qmap-store`; command handlers with boundary
//! logging live in `qmap-engine`.

pub mod cascade;
pub mod entities;
pub mod errors;
pub mod logging_facility;
pub mod ops;
pub mod placement;
pub mod render;
pub mod resolver;

// Re-export commonly used types
pub use cascade::{create_model, CascadeConfig};
pub use entities::{Element, Layout, Model, Position};
pub use errors::{ExError, ExErrorKind, QmapError, Result};
pub use ops::{EntityStore, MemoryStore};
pub use placement::{place_new_element, PlacementStrategy};
pub use render::{compose, Node};
pub use resolver::{resolve, Resolution};
