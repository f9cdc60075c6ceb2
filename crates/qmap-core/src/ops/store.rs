//! The persistence seam shared by every core algorithm
//!
//! Four collections (models, elements, layouts, positions), each with the
//! same list/get/create/update/delete contract. Implementations must:
//!
//! - assign opaque, stable ids and return lists in creation order
//! - apply the rules in [`validation`](super::validation) before writing
//! - reject a second position for the same `(layout_id, element_id)`
//! - cascade deletes: model -> layouts -> positions, element -> positions
//! - refuse to delete a layout that is still its model's default

use crate::entities::element::ElementUpdate;
use crate::entities::layout::LayoutUpdate;
use crate::entities::model::ModelUpdate;
use crate::entities::position::{NewPosition, PositionUpdate};
use crate::entities::{Element, Layout, Model, Position};
use crate::errors::Result;

/// CRUD contract over the four entity collections
///
/// # Errors
///
/// `get_*`, `update_*` and `delete_*` return the matching `*NotFound` error
/// for unknown ids. Creates and updates return `Validation` for missing or
/// malformed fields and `*NotFound` when a referenced entity is absent.
/// Storage engines report their own failures as `Persistence`.
pub trait EntityStore {
    // Models
    fn list_models(&self) -> Result<Vec<Model>>;
    fn get_model(&self, id: &str) -> Result<Model>;
    fn create_model(&mut self, label: &str) -> Result<Model>;
    fn update_model(&mut self, id: &str, update: ModelUpdate) -> Result<Model>;
    fn delete_model(&mut self, id: &str) -> Result<()>;

    // Elements
    fn list_elements(&self) -> Result<Vec<Element>>;
    fn get_element(&self, id: &str) -> Result<Element>;
    fn create_element(&mut self, label: &str) -> Result<Element>;
    fn update_element(&mut self, id: &str, update: ElementUpdate) -> Result<Element>;
    fn delete_element(&mut self, id: &str) -> Result<()>;

    // Layouts
    fn list_layouts(&self, model_id: &str) -> Result<Vec<Layout>>;
    fn get_layout(&self, id: &str) -> Result<Layout>;
    fn create_layout(&mut self, label: &str, model_id: &str) -> Result<Layout>;
    fn update_layout(&mut self, id: &str, update: LayoutUpdate) -> Result<Layout>;
    fn delete_layout(&mut self, id: &str) -> Result<()>;

    // Positions
    fn list_positions(&self, layout_id: &str) -> Result<Vec<Position>>;
    fn get_position(&self, id: &str) -> Result<Position>;
    fn create_position(&mut self, position: NewPosition) -> Result<Position>;
    fn update_position(&mut self, id: &str, update: PositionUpdate) -> Result<Position>;
    fn delete_position(&mut self, id: &str) -> Result<()>;
}
