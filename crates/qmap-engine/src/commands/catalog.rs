//! Boundary-logged operations over an `EntityStore`.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for every operation here:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()`/`warn!()` for
//! internal details.

use std::time::Instant;

use qmap_core::entities::position::NewPosition;
use qmap_core::errors::Result;
use qmap_core::{
    cascade, placement, render, resolver, CascadeConfig, Element, EntityStore, Layout, Model,
    Node, PlacementStrategy, Position, Resolution,
};
use qmap_core::{log_op_end, log_op_error, log_op_start};

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Run `f` between start and end/error events for `op`
fn logged<T>(op: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    log_op_start!(op);
    let start = Instant::now();

    let result = f().map_err(|e| {
        log_op_error!(op, e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(op, duration_ms = elapsed_ms(start));
    Ok(result)
}

pub fn list_models(store: &dyn EntityStore) -> Result<Vec<Model>> {
    logged("list_models", || store.list_models())
}

pub fn get_model(store: &dyn EntityStore, model_id: &str) -> Result<Model> {
    logged("get_model", || store.get_model(model_id))
}

/// Create a Model together with its default Layout
///
/// ## Errors
///
/// - `Validation`: blank label, nothing written
/// - `PartialCascadeFailure`: a later step failed; see `compensated`
pub fn create_model(
    store: &mut dyn EntityStore,
    label: &str,
    config: &CascadeConfig,
) -> Result<Model> {
    log_op_start!("create_model", label = label);
    let start = Instant::now();

    let model = cascade::create_model(store, label, config).map_err(|e| {
        log_op_error!("create_model", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "create_model",
        duration_ms = elapsed_ms(start),
        model_id = model.id.as_str(),
        layout_id = model.default_layout_id.as_deref().unwrap_or("")
    );
    Ok(model)
}

pub fn delete_model(store: &mut dyn EntityStore, model_id: &str) -> Result<()> {
    logged("delete_model", || store.delete_model(model_id))
}

/// Repair a Model left without a default layout
pub fn reconcile_model(
    store: &mut dyn EntityStore,
    model_id: &str,
    config: &CascadeConfig,
) -> Result<Model> {
    logged("reconcile_model", || {
        cascade::reconcile_model(store, model_id, config)
    })
}

pub fn list_layouts(store: &dyn EntityStore, model_id: &str) -> Result<Vec<Layout>> {
    logged("list_layouts", || store.list_layouts(model_id))
}

pub fn create_layout(store: &mut dyn EntityStore, label: &str, model_id: &str) -> Result<Layout> {
    logged("create_layout", || store.create_layout(label, model_id))
}

pub fn delete_layout(store: &mut dyn EntityStore, layout_id: &str) -> Result<()> {
    logged("delete_layout", || store.delete_layout(layout_id))
}

pub fn list_positions(store: &dyn EntityStore, layout_id: &str) -> Result<Vec<Position>> {
    logged("list_positions", || store.list_positions(layout_id))
}

pub fn create_position(
    store: &mut dyn EntityStore,
    layout_id: &str,
    element_id: &str,
    x: f64,
    y: f64,
) -> Result<Position> {
    logged("create_position", || {
        store.create_position(NewPosition::new(layout_id, element_id, x, y))
    })
}

pub fn create_element(store: &mut dyn EntityStore, label: &str) -> Result<Element> {
    logged("create_element", || store.create_element(label))
}

pub fn delete_element(store: &mut dyn EntityStore, element_id: &str) -> Result<()> {
    logged("delete_element", || store.delete_element(element_id))
}

/// Create an Element and place it in the given layout
///
/// ## Errors
///
/// - `PreconditionFailed`: no layout given, or it does not exist
/// - `Validation`: blank label
pub fn place_new_element(
    store: &mut dyn EntityStore,
    label: &str,
    layout_id: Option<&str>,
    strategy: &PlacementStrategy,
) -> Result<Node> {
    log_op_start!(
        "place_new_element",
        label = label,
        layout_id = layout_id.unwrap_or("")
    );
    let start = Instant::now();

    let node = placement::place_new_element(store, label, layout_id, strategy).map_err(|e| {
        log_op_error!(
            "place_new_element",
            e.clone(),
            duration_ms = elapsed_ms(start)
        );
        e
    })?;

    log_op_end!(
        "place_new_element",
        duration_ms = elapsed_ms(start),
        element_id = node.element_id.as_str()
    );
    Ok(node)
}

/// Compose a layout into render nodes
///
/// ## Errors
///
/// - `LayoutNotFound`
/// - `DanglingReference`: a position's element is gone
pub fn compose(store: &dyn EntityStore, layout_id: &str) -> Result<Vec<Node>> {
    log_op_start!("compose", layout_id = layout_id);
    let start = Instant::now();

    let nodes = render::compose(store, layout_id).map_err(|e| {
        log_op_error!("compose", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "compose",
        duration_ms = elapsed_ms(start),
        node_count = nodes.len() as u64
    );
    Ok(nodes)
}

pub fn resolve(store: &dyn EntityStore, model_id: &str) -> Result<Resolution> {
    resolve_with_selection(store, model_id, None)
}

/// Resolve a model's layouts, honoring a current selection when valid
pub fn resolve_with_selection(
    store: &dyn EntityStore,
    model_id: &str,
    selected_layout_id: Option<&str>,
) -> Result<Resolution> {
    log_op_start!("resolve", model_id = model_id);
    let start = Instant::now();

    let resolution = resolver::resolve_with_selection(store, model_id, selected_layout_id)
        .map_err(|e| {
            log_op_error!("resolve", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "resolve",
        duration_ms = elapsed_ms(start),
        layout_count = resolution.layouts.len() as u64
    );
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmap_core::errors::QmapError;
    use qmap_core::MemoryStore;

    #[test]
    fn test_create_position_builds_placement() {
        let mut store = MemoryStore::new();
        let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();
        let layout_id = model.default_layout_id.unwrap();
        let element = create_element(&mut store, "Temperature").unwrap();

        let position = create_position(&mut store, &layout_id, &element.id, 3.0, 4.0).unwrap();

        assert_eq!(position.layout_id, layout_id);
        assert_eq!((position.x, position.y), (3.0, 4.0));
        assert_eq!(list_positions(&store, &layout_id).unwrap(), vec![position]);
    }

    #[test]
    fn test_errors_pass_through_unchanged() {
        let store = MemoryStore::new();
        assert!(matches!(
            get_model(&store, "missing"),
            Err(QmapError::ModelNotFound { .. })
        ));
    }
}
