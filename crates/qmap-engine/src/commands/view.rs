//! Presentation-level command handlers
//!
//! The current selection lives in an explicit [`ViewState`] value. Each
//! handler takes the caller's state by reference and returns the next one;
//! on error the caller simply keeps what it had, so a failed action never
//! leaves a half-updated view.

use qmap_core::errors::{QmapError, Result};
use qmap_core::{EntityStore, Node};
use serde::Serialize;

use super::catalog;
use crate::config::QmapConfig;

/// Which model and layout the presentation layer is showing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub selected_model_id: Option<String>,
    pub active_layout_id: Option<String>,
}

impl ViewState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_model_id.is_none()
    }
}

/// Starting view: the first complete Model and its default layout
///
/// # Errors
///
/// Store failures while listing models.
pub fn initial_view(store: &dyn EntityStore) -> Result<ViewState> {
    let first = catalog::list_models(store)?
        .into_iter()
        .find(|m| m.is_complete());

    match first {
        Some(model) => select(store, &model.id, None),
        None => Ok(ViewState::empty()),
    }
}

/// Create a Model (with its default layout) and select it
///
/// # Errors
///
/// Whatever the cascade reports; `view` is left as it was.
pub fn on_create_model(
    store: &mut dyn EntityStore,
    _view: &ViewState,
    label: &str,
    config: &QmapConfig,
) -> Result<ViewState> {
    let model = catalog::create_model(store, label, &config.cascade)?;
    Ok(ViewState {
        selected_model_id: Some(model.id),
        active_layout_id: model.default_layout_id,
    })
}

/// Select a Model and activate its default layout
///
/// # Errors
///
/// `ModelNotFound` for an unknown id.
pub fn on_select_model(
    store: &dyn EntityStore,
    _view: &ViewState,
    model_id: &str,
) -> Result<ViewState> {
    select(store, model_id, None)
}

/// Switch to another layout of the selected Model
///
/// # Errors
///
/// `PreconditionFailed` when no model is selected or the layout does not
/// belong to it.
pub fn on_select_layout(
    store: &dyn EntityStore,
    view: &ViewState,
    layout_id: &str,
) -> Result<ViewState> {
    let model_id = view
        .selected_model_id
        .as_deref()
        .ok_or_else(|| QmapError::precondition("no model selected"))?;

    let next = select(store, model_id, Some(layout_id))?;
    if next.active_layout_id.as_deref() != Some(layout_id) {
        return Err(QmapError::precondition(format!(
            "layout {} does not belong to model {}",
            layout_id, model_id
        )));
    }
    Ok(next)
}

/// Place a new element in the active layout
///
/// Returns the unchanged view together with the node to display.
///
/// # Errors
///
/// `PreconditionFailed` when no layout is active.
pub fn on_place_element(
    store: &mut dyn EntityStore,
    view: &ViewState,
    label: &str,
    config: &QmapConfig,
) -> Result<(ViewState, Node)> {
    let node = catalog::place_new_element(
        store,
        label,
        view.active_layout_id.as_deref(),
        &config.placement,
    )?;
    Ok((view.clone(), node))
}

/// Nodes to display for the current view
///
/// # Errors
///
/// `DanglingReference` or `LayoutNotFound` from composition.
pub fn refresh(store: &dyn EntityStore, view: &ViewState) -> Result<Vec<Node>> {
    match view.active_layout_id.as_deref() {
        Some(layout_id) => catalog::compose(store, layout_id),
        None => Ok(Vec::new()),
    }
}

fn select(
    store: &dyn EntityStore,
    model_id: &str,
    selected_layout_id: Option<&str>,
) -> Result<ViewState> {
    let resolution = catalog::resolve_with_selection(store, model_id, selected_layout_id)?;
    Ok(ViewState {
        selected_model_id: Some(model_id.to_string()),
        active_layout_id: resolution.active_layout_id,
    })
}
