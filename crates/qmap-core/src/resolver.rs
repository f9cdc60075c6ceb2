use serde::Serialize;

use crate::entities::Layout;
use crate::errors::Result;
use crate::ops::EntityStore;

/// The layouts of a model and the one to show first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Layouts of the model in creation order
    pub layouts: Vec<Layout>,
    /// `None` means "nothing to render", never an error
    pub active_layout_id: Option<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn active_layout(&self) -> Option<&Layout> {
        let id = self.active_layout_id.as_deref()?;
        self.layouts.iter().find(|l| l.id == id)
    }
}

/// Resolve the layouts of a model, activating its default layout
///
/// # Errors
///
/// `ModelNotFound` for an unknown model.
pub fn resolve(store: &dyn EntityStore, model_id: &str) -> Result<Resolution> {
    resolve_with_selection(store, model_id, None)
}

/// Resolve the layouts of a model, preferring an explicit selection
///
/// The selection wins when it names one of the model's layouts; anything
/// else falls back to the model's default layout. An active id that is not
/// among the listed layouts is reported as absent.
///
/// # Errors
///
/// `ModelNotFound` for an unknown model.
pub fn resolve_with_selection(
    store: &dyn EntityStore,
    model_id: &str,
    selected_layout_id: Option<&str>,
) -> Result<Resolution> {
    let model = store.get_model(model_id)?;
    let layouts = store.list_layouts(model_id)?;

    let owns = |id: &str| layouts.iter().any(|l| l.id == id);
    let active_layout_id = selected_layout_id
        .filter(|id| owns(id))
        .or(model.default_layout_id.as_deref().filter(|id| owns(id)))
        .map(str::to_string);

    tracing::debug!(
        model_id,
        layout_count = layouts.len(),
        active = active_layout_id.as_deref().unwrap_or(""),
        "layouts resolved"
    );

    Ok(Resolution {
        layouts,
        active_layout_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{create_model, CascadeConfig};
    use crate::errors::QmapError;
    use crate::ops::MemoryStore;

    #[test]
    fn test_resolve_activates_default_layout() {
        let mut store = MemoryStore::new();
        let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();
        store.create_layout("alternative", &model.id).unwrap();

        let resolution = resolve(&store, &model.id).unwrap();

        assert_eq!(resolution.layouts.len(), 2);
        assert_eq!(resolution.active_layout_id, model.default_layout_id);
        assert_eq!(resolution.active_layout().unwrap().label, "default");
    }

    #[test]
    fn test_selection_overrides_default() {
        let mut store = MemoryStore::new();
        let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();
        let alt = store.create_layout("alternative", &model.id).unwrap();

        let resolution = resolve_with_selection(&store, &model.id, Some(&alt.id)).unwrap();
        assert_eq!(resolution.active_layout_id.as_deref(), Some(alt.id.as_str()));
    }

    #[test]
    fn test_foreign_selection_falls_back_to_default() {
        let mut store = MemoryStore::new();
        let config = CascadeConfig::default();
        let model = create_model(&mut store, "Climate", &config).unwrap();
        let other = create_model(&mut store, "Economy", &config).unwrap();

        let foreign = other.default_layout_id.as_deref();
        let resolution = resolve_with_selection(&store, &model.id, foreign).unwrap();
        assert_eq!(resolution.active_layout_id, model.default_layout_id);
    }

    #[test]
    fn test_model_without_layouts_resolves_empty() {
        let mut store = MemoryStore::new();
        let orphan = store.create_model("Orphan").unwrap();

        let resolution = resolve(&store, &orphan.id).unwrap();
        assert!(resolution.is_empty());
        assert!(resolution.active_layout_id.is_none());
        assert!(resolution.active_layout().is_none());
    }

    #[test]
    fn test_unknown_model_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            resolve(&store, "missing"),
            Err(QmapError::ModelNotFound { .. })
        ));
    }
}
