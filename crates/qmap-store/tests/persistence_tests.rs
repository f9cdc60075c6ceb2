// Integration tests for the SQLite store: the map survives a reopen and
// behaves like the in-memory store.

use qmap_core::render::cytoscape_elements;
use qmap_core::{
    compose, create_model, place_new_element, resolve, CascadeConfig, EntityStore,
    PlacementStrategy,
};
use qmap_store::SqliteStore;
use tempfile::TempDir;

fn setup_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("qmap.db");
    (dir, path)
}

#[test]
fn test_map_survives_reopen() {
    // Given: a model with a placed element written to disk
    let (_dir, path) = setup_db();
    let (model_id, layout_id, nodes_before) = {
        let mut store = SqliteStore::open(&path).unwrap();
        let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();
        let layout_id = model.default_layout_id.clone().unwrap();
        place_new_element(
            &mut store,
            "Temperature",
            Some(layout_id.as_str()),
            &PlacementStrategy::Origin,
        )
        .unwrap();
        let nodes = compose(&store, &layout_id).unwrap();
        (model.id, layout_id, nodes)
    };

    // When: the database is reopened
    let store = SqliteStore::open(&path).unwrap();

    // Then: resolution and composition are unchanged
    let resolution = resolve(&store, &model_id).unwrap();
    assert_eq!(resolution.active_layout_id.as_deref(), Some(layout_id.as_str()));
    let nodes_after = compose(&store, &layout_id).unwrap();
    assert_eq!(nodes_after, nodes_before);
    assert_eq!(
        cytoscape_elements(&nodes_after),
        cytoscape_elements(&nodes_before)
    );
}

#[test]
fn test_reopen_is_idempotent_for_migrations() {
    let (_dir, path) = setup_db();
    drop(SqliteStore::open(&path).unwrap());
    let store = SqliteStore::open(&path).unwrap();

    let applied: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, 1);
}

#[test]
fn test_placement_precondition_leaves_db_unchanged() {
    let mut store = SqliteStore::open_in_memory().unwrap();

    let result = place_new_element(
        &mut store,
        "Rainfall",
        Some("missing-layout"),
        &PlacementStrategy::Origin,
    );

    assert!(result.is_err());
    assert!(store.list_elements().unwrap().is_empty());
}

#[test]
fn test_grid_placement_persists_coordinates() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();
    let layout_id = model.default_layout_id.unwrap();
    let grid = PlacementStrategy::Grid {
        spacing: 120.0,
        columns: 4,
    };

    for label in ["a", "b"] {
        place_new_element(&mut store, label, Some(layout_id.as_str()), &grid).unwrap();
    }

    let coords: Vec<_> = store
        .list_positions(&layout_id)
        .unwrap()
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(coords, vec![(0.0, 0.0), (120.0, 0.0)]);
}
