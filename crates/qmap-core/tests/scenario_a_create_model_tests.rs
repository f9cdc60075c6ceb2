//! Scenario A: creating a model provisions exactly one default layout

use qmap_core::{create_model, CascadeConfig, EntityStore, Layout, MemoryStore};

#[test]
fn test_create_model_returns_model_with_default_layout() {
    // GIVEN an empty store
    let mut store = MemoryStore::new();

    // WHEN a model "Climate" is created
    let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();

    // THEN the model carries a default layout id
    assert_eq!(model.label, "Climate");
    let l1 = model.default_layout_id.clone().expect("default layout");

    // AND listing its layouts yields exactly that layout, labelled "default"
    let layouts: Vec<Layout> = store.list_layouts(&model.id).unwrap();
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].id, l1);
    assert_eq!(layouts[0].label, "default");
    assert_eq!(layouts[0].model_id, model.id);
}

#[test]
fn test_default_layout_belongs_to_its_model_for_every_model() {
    let mut store = MemoryStore::new();
    let config = CascadeConfig::default();
    for label in ["Climate", "Economy", "Health", "Transport"] {
        create_model(&mut store, label, &config).unwrap();
    }

    for model in store.list_models().unwrap() {
        let layout_id = model.default_layout_id.as_deref().unwrap();
        assert_eq!(store.get_layout(layout_id).unwrap().model_id, model.id);
    }
}

#[test]
fn test_stored_model_matches_returned_model() {
    let mut store = MemoryStore::new();
    let model = create_model(&mut store, "  Climate  ", &CascadeConfig::default()).unwrap();

    assert_eq!(model.label, "Climate");
    assert_eq!(store.get_model(&model.id).unwrap(), model);
}
