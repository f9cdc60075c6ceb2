//! Render composition: Positions joined with Elements into display nodes

pub mod compose;
pub mod node;

pub use compose::{compose, compose_partitioned, Composition, DanglingPosition};
pub use node::{cytoscape_elements, Node};
