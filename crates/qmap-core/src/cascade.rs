//! Model cascade: a Model is only ever handed out together with its
//! default Layout.
//!
//! The store has no multi-entity transactions, so creation runs as a saga:
//!
//! 1. create the Model (`default_layout_id = None`)
//! 2. create the default Layout owned by it
//! 3. point the Model at that Layout
//!
//! Step 2 is not idempotent and is never retried; a failure there deletes
//! the Model again. Step 3 is idempotent and is retried up to
//! `CascadeConfig::max_attempts` times before the Model (and with it the
//! Layout) is deleted. Either way the caller sees `PartialCascadeFailure`.

use serde::Deserialize;

use crate::entities::model::ModelUpdate;
use crate::entities::{Layout, Model};
use crate::errors::{CascadeStep, QmapError, Result};
use crate::ops::EntityStore;

/// Tuning for the model cascade
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Attempts for the idempotent link step (values below 1 count as 1)
    pub max_attempts: u32,
    /// Label given to the Layout provisioned with every new Model
    pub default_layout_label: String,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_layout_label: "default".to_string(),
        }
    }
}

/// Create a Model together with its default Layout
///
/// Returns the finalized Model, whose `default_layout_id` references a
/// Layout owned by it.
///
/// # Errors
///
/// - `Validation` if the label is blank (nothing is written)
/// - whatever step 1 reports, unchanged (nothing was written)
/// - `PartialCascadeFailure` if step 2 or 3 failed after the Model existed
pub fn create_model(
    store: &mut dyn EntityStore,
    label: &str,
    config: &CascadeConfig,
) -> Result<Model> {
    let model = store.create_model(label)?;
    tracing::debug!(model_id = %model.id, "cascade step 1: model created");

    let layout = match store.create_layout(&config.default_layout_label, &model.id) {
        Ok(layout) => layout,
        Err(source) => {
            return Err(compensate(
                store,
                &model.id,
                None,
                CascadeStep::CreateDefaultLayout,
                source,
            ));
        }
    };
    tracing::debug!(model_id = %model.id, layout_id = %layout.id, "cascade step 2: default layout created");

    link_default_layout(store, &model.id, &layout, config)
}

/// Step 3 with retries; compensates when every attempt fails
fn link_default_layout(
    store: &mut dyn EntityStore,
    model_id: &str,
    layout: &Layout,
    config: &CascadeConfig,
) -> Result<Model> {
    let attempts = config.max_attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match store.update_model(model_id, ModelUpdate::default_layout(&layout.id)) {
            Ok(model) => {
                tracing::debug!(model_id, layout_id = %layout.id, attempt, "cascade step 3: default layout linked");
                return Ok(model);
            }
            Err(err) => {
                tracing::warn!(model_id, attempt, error = %err, "linking default layout failed");
                last_err = Some(err);
            }
        }
    }

    let source = last_err.unwrap_or_else(|| QmapError::precondition("link step never attempted"));
    Err(compensate(
        store,
        model_id,
        Some(layout.id.clone()),
        CascadeStep::LinkDefaultLayout,
        source,
    ))
}

/// Roll back a partially created Model and build the failure report
fn compensate(
    store: &mut dyn EntityStore,
    model_id: &str,
    layout_id: Option<String>,
    step: CascadeStep,
    source: QmapError,
) -> QmapError {
    let compensated = match store.delete_model(model_id) {
        Ok(()) => {
            tracing::warn!(model_id, %step, "cascade failed; partially created model removed");
            true
        }
        Err(err) => {
            tracing::warn!(model_id, %step, error = %err, "cascade compensation failed; model left incomplete");
            false
        }
    };

    QmapError::PartialCascadeFailure {
        model_id: model_id.to_string(),
        layout_id,
        step,
        compensated,
        source: Box::new(source),
    }
}

/// Models that have no default layout (left behind by an uncompensated
/// cascade failure)
///
/// # Errors
///
/// Propagates store failures.
pub fn incomplete_models(store: &dyn EntityStore) -> Result<Vec<Model>> {
    Ok(store
        .list_models()?
        .into_iter()
        .filter(|m| !m.is_complete())
        .collect())
}

/// Bring an incomplete Model back to a consistent state
///
/// An existing Layout of the Model is reused as the default (step 3 only);
/// a Model without any Layout gets steps 2 and 3. Complete Models are
/// returned unchanged.
///
/// # Errors
///
/// - `ModelNotFound` for an unknown id
/// - `PartialCascadeFailure` if the repair itself fails part way
pub fn reconcile_model(
    store: &mut dyn EntityStore,
    model_id: &str,
    config: &CascadeConfig,
) -> Result<Model> {
    let model = store.get_model(model_id)?;
    if model.is_complete() {
        return Ok(model);
    }

    let existing = store.list_layouts(model_id)?.into_iter().next();
    let layout = match existing {
        Some(layout) => layout,
        None => match store.create_layout(&config.default_layout_label, model_id) {
            Ok(layout) => layout,
            Err(source) => {
                return Err(QmapError::PartialCascadeFailure {
                    model_id: model_id.to_string(),
                    layout_id: None,
                    step: CascadeStep::CreateDefaultLayout,
                    compensated: false,
                    source: Box::new(source),
                });
            }
        },
    };

    link_default_layout(store, model_id, &layout, config)
}
