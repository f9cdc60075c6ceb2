use std::cell::Cell;

use qmap_core::entities::element::ElementUpdate;
use qmap_core::entities::layout::LayoutUpdate;
use qmap_core::entities::model::ModelUpdate;
use qmap_core::entities::position::{NewPosition, PositionUpdate};
use qmap_core::errors::{QmapError, Result};
use qmap_core::{Element, EntityStore, Layout, MemoryStore, Model, Position};

/// Store wrapper that fails selected operations on demand
///
/// Counters say how many upcoming calls of that operation fail; zero means
/// the call is delegated to the inner store.
#[allow(dead_code)]
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_create_layout: Cell<u32>,
    pub fail_update_model: Cell<u32>,
    pub fail_delete_model: Cell<u32>,
    pub fail_create_position: Cell<u32>,
    pub fail_delete_element: Cell<u32>,
    pub update_model_calls: Cell<u32>,
}

#[allow(dead_code)]
impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn trip(counter: &Cell<u32>, op: &str) -> Result<()> {
        let remaining = counter.get();
        if remaining > 0 {
            counter.set(remaining - 1);
            return Err(QmapError::Persistence {
                op: op.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl EntityStore for FaultyStore {
    fn list_models(&self) -> Result<Vec<Model>> {
        self.inner.list_models()
    }
    fn get_model(&self, id: &str) -> Result<Model> {
        self.inner.get_model(id)
    }
    fn create_model(&mut self, label: &str) -> Result<Model> {
        self.inner.create_model(label)
    }
    fn update_model(&mut self, id: &str, update: ModelUpdate) -> Result<Model> {
        self.update_model_calls.set(self.update_model_calls.get() + 1);
        Self::trip(&self.fail_update_model, "update_model")?;
        self.inner.update_model(id, update)
    }
    fn delete_model(&mut self, id: &str) -> Result<()> {
        Self::trip(&self.fail_delete_model, "delete_model")?;
        self.inner.delete_model(id)
    }

    fn list_elements(&self) -> Result<Vec<Element>> {
        self.inner.list_elements()
    }
    fn get_element(&self, id: &str) -> Result<Element> {
        self.inner.get_element(id)
    }
    fn create_element(&mut self, label: &str) -> Result<Element> {
        self.inner.create_element(label)
    }
    fn update_element(&mut self, id: &str, update: ElementUpdate) -> Result<Element> {
        self.inner.update_element(id, update)
    }
    fn delete_element(&mut self, id: &str) -> Result<()> {
        Self::trip(&self.fail_delete_element, "delete_element")?;
        self.inner.delete_element(id)
    }

    fn list_layouts(&self, model_id: &str) -> Result<Vec<Layout>> {
        self.inner.list_layouts(model_id)
    }
    fn get_layout(&self, id: &str) -> Result<Layout> {
        self.inner.get_layout(id)
    }
    fn create_layout(&mut self, label: &str, model_id: &str) -> Result<Layout> {
        Self::trip(&self.fail_create_layout, "create_layout")?;
        self.inner.create_layout(label, model_id)
    }
    fn update_layout(&mut self, id: &str, update: LayoutUpdate) -> Result<Layout> {
        self.inner.update_layout(id, update)
    }
    fn delete_layout(&mut self, id: &str) -> Result<()> {
        self.inner.delete_layout(id)
    }

    fn list_positions(&self, layout_id: &str) -> Result<Vec<Position>> {
        self.inner.list_positions(layout_id)
    }
    fn get_position(&self, id: &str) -> Result<Position> {
        self.inner.get_position(id)
    }
    fn create_position(&mut self, position: NewPosition) -> Result<Position> {
        Self::trip(&self.fail_create_position, "create_position")?;
        self.inner.create_position(position)
    }
    fn update_position(&mut self, id: &str, update: PositionUpdate) -> Result<Position> {
        self.inner.update_position(id, update)
    }
    fn delete_position(&mut self, id: &str) -> Result<()> {
        self.inner.delete_position(id)
    }
}
