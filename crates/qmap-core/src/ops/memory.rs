use chrono::Utc;
use indexmap::IndexMap;
use uuid::Uuid;

use super::store::EntityStore;
use super::validation;
use crate::entities::element::ElementUpdate;
use crate::entities::layout::LayoutUpdate;
use crate::entities::model::ModelUpdate;
use crate::entities::position::{NewPosition, PositionUpdate};
use crate::entities::{Element, Layout, Model, Position};
use crate::errors::{QmapError, Result};

/// In-memory entity store
///
/// Insertion-ordered maps keep list results in creation order. Not
/// thread-safe; wrap it in a lock if several callers share it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) models: IndexMap<String, Model>,
    pub(crate) elements: IndexMap<String, Element>,
    pub(crate) layouts: IndexMap<String, Layout>,
    pub(crate) positions: IndexMap<String, Position>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position without any validation or uniqueness check
    ///
    /// Test helper for building corrupted fixtures (dangling references,
    /// duplicate placements) that the checked API refuses to create.
    pub fn insert_position_unchecked(&mut self, position: Position) {
        self.positions.insert(position.id.clone(), position);
    }

    /// Insert a model as-is, bypassing the cascade (test setup)
    pub fn insert_model_unchecked(&mut self, model: Model) {
        self.models.insert(model.id.clone(), model);
    }

    /// Total number of positions across all layouts
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    fn model_mut(&mut self, id: &str) -> Result<&mut Model> {
        self.models
            .get_mut(id)
            .ok_or_else(|| QmapError::ModelNotFound {
                model_id: id.to_string(),
            })
    }

    fn remove_positions_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Position) -> bool,
    {
        let before = self.positions.len();
        self.positions.retain(|_, p| !predicate(p));
        before - self.positions.len()
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

impl EntityStore for MemoryStore {
    fn list_models(&self) -> Result<Vec<Model>> {
        Ok(self.models.values().cloned().collect())
    }

    fn get_model(&self, id: &str) -> Result<Model> {
        self.models
            .get(id)
            .cloned()
            .ok_or_else(|| QmapError::ModelNotFound {
                model_id: id.to_string(),
            })
    }

    fn create_model(&mut self, label: &str) -> Result<Model> {
        let label = validation::label("label", label)?;
        let model = Model::new(new_id(), label);
        self.models.insert(model.id.clone(), model.clone());
        Ok(model)
    }

    fn update_model(&mut self, id: &str, update: ModelUpdate) -> Result<Model> {
        let label = update
            .label
            .as_deref()
            .map(|l| validation::label("label", l))
            .transpose()?;

        // Check before touching the model so a bad update changes nothing
        self.get_model(id)?;
        if let Some(layout_id) = &update.default_layout_id {
            let layout = self.get_layout(layout_id)?;
            if layout.model_id != id {
                return Err(QmapError::DefaultLayoutMismatch {
                    model_id: id.to_string(),
                    layout_id: layout_id.clone(),
                });
            }
        }

        let model = self.model_mut(id)?;
        if let Some(label) = label {
            model.label = label;
        }
        if let Some(layout_id) = update.default_layout_id {
            model.default_layout_id = Some(layout_id);
        }
        model.updated_at = Utc::now();
        Ok(model.clone())
    }

    fn delete_model(&mut self, id: &str) -> Result<()> {
        self.models
            .shift_remove(id)
            .ok_or_else(|| QmapError::ModelNotFound {
                model_id: id.to_string(),
            })?;

        let layout_ids: Vec<String> = self
            .layouts
            .values()
            .filter(|l| l.model_id == id)
            .map(|l| l.id.clone())
            .collect();
        let removed = self.remove_positions_where(|p| layout_ids.contains(&p.layout_id));
        self.layouts.retain(|_, l| l.model_id != id);

        tracing::debug!(
            model_id = id,
            layouts = layout_ids.len(),
            positions = removed,
            "model deleted with cascade"
        );
        Ok(())
    }

    fn list_elements(&self) -> Result<Vec<Element>> {
        Ok(self.elements.values().cloned().collect())
    }

    fn get_element(&self, id: &str) -> Result<Element> {
        self.elements
            .get(id)
            .cloned()
            .ok_or_else(|| QmapError::ElementNotFound {
                element_id: id.to_string(),
            })
    }

    fn create_element(&mut self, label: &str) -> Result<Element> {
        let label = validation::label("label", label)?;
        let element = Element::new(new_id(), label);
        self.elements.insert(element.id.clone(), element.clone());
        Ok(element)
    }

    fn update_element(&mut self, id: &str, update: ElementUpdate) -> Result<Element> {
        let label = update
            .label
            .as_deref()
            .map(|l| validation::label("label", l))
            .transpose()?;

        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| QmapError::ElementNotFound {
                element_id: id.to_string(),
            })?;
        if let Some(label) = label {
            element.label = label;
        }
        element.updated_at = Utc::now();
        Ok(element.clone())
    }

    fn delete_element(&mut self, id: &str) -> Result<()> {
        self.elements
            .shift_remove(id)
            .ok_or_else(|| QmapError::ElementNotFound {
                element_id: id.to_string(),
            })?;
        let removed = self.remove_positions_where(|p| p.element_id == id);
        tracing::debug!(element_id = id, positions = removed, "element deleted");
        Ok(())
    }

    fn list_layouts(&self, model_id: &str) -> Result<Vec<Layout>> {
        Ok(self
            .layouts
            .values()
            .filter(|l| l.model_id == model_id)
            .cloned()
            .collect())
    }

    fn get_layout(&self, id: &str) -> Result<Layout> {
        self.layouts
            .get(id)
            .cloned()
            .ok_or_else(|| QmapError::LayoutNotFound {
                layout_id: id.to_string(),
            })
    }

    fn create_layout(&mut self, label: &str, model_id: &str) -> Result<Layout> {
        let label = validation::label("label", label)?;
        validation::reference("model_id", model_id)?;
        self.get_model(model_id)?;

        let layout = Layout::new(new_id(), label, model_id.to_string());
        self.layouts.insert(layout.id.clone(), layout.clone());
        Ok(layout)
    }

    fn update_layout(&mut self, id: &str, update: LayoutUpdate) -> Result<Layout> {
        let label = update
            .label
            .as_deref()
            .map(|l| validation::label("label", l))
            .transpose()?;

        let layout = self
            .layouts
            .get_mut(id)
            .ok_or_else(|| QmapError::LayoutNotFound {
                layout_id: id.to_string(),
            })?;
        if let Some(label) = label {
            layout.label = label;
        }
        layout.updated_at = Utc::now();
        Ok(layout.clone())
    }

    fn delete_layout(&mut self, id: &str) -> Result<()> {
        let layout = self.get_layout(id)?;
        if let Some(owner) = self.models.get(&layout.model_id) {
            if owner.default_layout_id.as_deref() == Some(id) {
                return Err(QmapError::DefaultLayoutInUse {
                    layout_id: id.to_string(),
                    model_id: owner.id.clone(),
                });
            }
        }

        self.layouts.shift_remove(id);
        let removed = self.remove_positions_where(|p| p.layout_id == id);
        tracing::debug!(layout_id = id, positions = removed, "layout deleted");
        Ok(())
    }

    fn list_positions(&self, layout_id: &str) -> Result<Vec<Position>> {
        Ok(self
            .positions
            .values()
            .filter(|p| p.layout_id == layout_id)
            .cloned()
            .collect())
    }

    fn get_position(&self, id: &str) -> Result<Position> {
        self.positions
            .get(id)
            .cloned()
            .ok_or_else(|| QmapError::PositionNotFound {
                position_id: id.to_string(),
            })
    }

    fn create_position(&mut self, position: NewPosition) -> Result<Position> {
        validation::new_position(&position)?;
        self.get_layout(&position.layout_id)?;
        self.get_element(&position.element_id)?;

        let taken = self
            .positions
            .values()
            .any(|p| p.layout_id == position.layout_id && p.element_id == position.element_id);
        if taken {
            return Err(QmapError::PositionConflict {
                layout_id: position.layout_id,
                element_id: position.element_id,
            });
        }

        let position = Position::new(new_id(), position);
        self.positions.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    fn update_position(&mut self, id: &str, update: PositionUpdate) -> Result<Position> {
        validation::position_update(&update)?;

        let position = self
            .positions
            .get_mut(id)
            .ok_or_else(|| QmapError::PositionNotFound {
                position_id: id.to_string(),
            })?;
        if let Some(x) = update.x {
            position.x = x;
        }
        if let Some(y) = update.y {
            position.y = y;
        }
        position.updated_at = Utc::now();
        Ok(position.clone())
    }

    fn delete_position(&mut self, id: &str) -> Result<()> {
        self.positions
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| QmapError::PositionNotFound {
                position_id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_layout(store: &mut MemoryStore) -> (Model, Layout) {
        let model = store.create_model("Climate").unwrap();
        let layout = store.create_layout("default", &model.id).unwrap();
        let model = store
            .update_model(&model.id, ModelUpdate::default_layout(&layout.id))
            .unwrap();
        (model, layout)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list_models().unwrap().is_empty());
        assert!(store.list_elements().unwrap().is_empty());
        assert_eq!(store.position_count(), 0);
    }

    #[test]
    fn test_lists_preserve_creation_order() {
        let mut store = MemoryStore::new();
        let labels = ["a", "b", "c", "d"];
        for label in labels {
            store.create_element(label).unwrap();
        }
        let listed: Vec<_> = store
            .list_elements()
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(listed, labels);
    }

    #[test]
    fn test_get_unknown_ids() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_model("nope"),
            Err(QmapError::ModelNotFound { .. })
        ));
        assert!(matches!(
            store.get_layout("nope"),
            Err(QmapError::LayoutNotFound { .. })
        ));
        assert!(matches!(
            store.get_position("nope"),
            Err(QmapError::PositionNotFound { .. })
        ));
    }

    #[test]
    fn test_default_layout_must_belong_to_model() {
        let mut store = MemoryStore::new();
        let (_, foreign_layout) = model_with_layout(&mut store);
        let other = store.create_model("Other").unwrap();

        let result = store.update_model(&other.id, ModelUpdate::default_layout(&foreign_layout.id));
        assert!(matches!(
            result,
            Err(QmapError::DefaultLayoutMismatch { .. })
        ));
        assert!(!store.get_model(&other.id).unwrap().is_complete());
    }

    #[test]
    fn test_default_layout_cannot_be_deleted() {
        let mut store = MemoryStore::new();
        let (model, layout) = model_with_layout(&mut store);

        let result = store.delete_layout(&layout.id);
        assert!(matches!(
            result,
            Err(QmapError::DefaultLayoutInUse { ref model_id, .. }) if *model_id == model.id
        ));
        assert!(store.get_layout(&layout.id).is_ok());
    }

    #[test]
    fn test_position_uniqueness_per_layout() {
        let mut store = MemoryStore::new();
        let (_, layout) = model_with_layout(&mut store);
        let element = store.create_element("Temperature").unwrap();

        store
            .create_position(NewPosition::new(&layout.id, &element.id, 0.0, 0.0))
            .unwrap();
        let again = store.create_position(NewPosition::new(&layout.id, &element.id, 5.0, 5.0));

        assert!(matches!(again, Err(QmapError::PositionConflict { .. })));
        assert_eq!(store.list_positions(&layout.id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_element_cascades_across_layouts() {
        let mut store = MemoryStore::new();
        let (model, first) = model_with_layout(&mut store);
        let second = store.create_layout("alternative", &model.id).unwrap();
        let element = store.create_element("Rainfall").unwrap();
        let keep = store.create_element("Humidity").unwrap();

        for layout in [&first, &second] {
            store
                .create_position(NewPosition::new(&layout.id, &element.id, 1.0, 2.0))
                .unwrap();
        }
        store
            .create_position(NewPosition::new(&first.id, &keep.id, 3.0, 4.0))
            .unwrap();

        store.delete_element(&element.id).unwrap();

        assert_eq!(store.position_count(), 1);
        assert!(store.list_positions(&second.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_model_cascades_layouts_and_positions() {
        let mut store = MemoryStore::new();
        let (model, layout) = model_with_layout(&mut store);
        let element = store.create_element("Rainfall").unwrap();
        store
            .create_position(NewPosition::new(&layout.id, &element.id, 0.0, 0.0))
            .unwrap();

        store.delete_model(&model.id).unwrap();

        assert!(store.list_layouts(&model.id).unwrap().is_empty());
        assert_eq!(store.position_count(), 0);
        // Elements are global and survive
        assert!(store.get_element(&element.id).is_ok());
    }

    #[test]
    fn test_failed_update_leaves_entity_unchanged() {
        let mut store = MemoryStore::new();
        let element = store.create_element("Rainfall").unwrap();

        let result = store.update_element(
            &element.id,
            ElementUpdate {
                label: Some("  ".to_string()),
            },
        );

        assert!(result.is_err());
        assert_eq!(store.get_element(&element.id).unwrap().label, "Rainfall");
    }
}
