//! Scenario D: a failing cascade never yields an orphan reported as valid

mod common;

use common::FaultyStore;
use qmap_core::cascade::{incomplete_models, reconcile_model};
use qmap_core::errors::{CascadeStep, ExErrorKind};
use qmap_core::{create_model, CascadeConfig, EntityStore, QmapError};

#[test]
fn test_layout_creation_failure_rolls_back_model() {
    // GIVEN a store whose next layout creation fails
    let mut store = FaultyStore::new();
    store.fail_create_layout.set(1);

    // WHEN a model is created
    let err = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap_err();

    // THEN the failure is a partial cascade failure at step 2, compensated
    assert_eq!(err.kind(), ExErrorKind::PartialCascadeFailure);
    match err {
        QmapError::PartialCascadeFailure {
            step,
            compensated,
            layout_id,
            ..
        } => {
            assert_eq!(step, CascadeStep::CreateDefaultLayout);
            assert!(compensated);
            assert!(layout_id.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // AND the orphan model is not listed
    assert!(store.list_models().unwrap().is_empty());
}

#[test]
fn test_uncompensated_orphan_is_flagged_incomplete() {
    let mut store = FaultyStore::new();
    store.fail_create_layout.set(1);
    store.fail_delete_model.set(1);

    let err = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap_err();
    let model_id = match err {
        QmapError::PartialCascadeFailure {
            model_id,
            compensated,
            ..
        } => {
            assert!(!compensated);
            model_id
        }
        other => panic!("unexpected error: {other:?}"),
    };

    // The orphan is visible but never as a complete model
    let models = store.list_models().unwrap();
    assert_eq!(models.len(), 1);
    assert!(!models[0].is_complete());
    assert_eq!(incomplete_models(&store).unwrap()[0].id, model_id);

    // Manual cleanup finishes the cascade
    let repaired = reconcile_model(&mut store, &model_id, &CascadeConfig::default()).unwrap();
    assert!(repaired.is_complete());
    assert_eq!(store.list_layouts(&model_id).unwrap().len(), 1);
}

#[test]
fn test_link_step_is_retried_without_recreating_layout() {
    let mut store = FaultyStore::new();
    store.fail_update_model.set(2);

    let model = create_model(&mut store, "Climate", &CascadeConfig::default()).unwrap();

    assert!(model.is_complete());
    assert_eq!(store.update_model_calls.get(), 3);
    assert_eq!(store.list_layouts(&model.id).unwrap().len(), 1);
}

#[test]
fn test_link_step_exhausted_compensates() {
    let mut store = FaultyStore::new();
    store.fail_update_model.set(10);
    let config = CascadeConfig {
        max_attempts: 2,
        ..CascadeConfig::default()
    };

    let err = create_model(&mut store, "Climate", &config).unwrap_err();

    match err {
        QmapError::PartialCascadeFailure {
            step,
            compensated,
            layout_id,
            model_id,
            ..
        } => {
            assert_eq!(step, CascadeStep::LinkDefaultLayout);
            assert!(compensated);
            let layout_id = layout_id.expect("layout was created before linking");
            assert!(store.get_model(&model_id).is_err());
            assert!(store.get_layout(&layout_id).is_err());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.update_model_calls.get(), 2);
    assert!(store.list_models().unwrap().is_empty());
}

#[test]
fn test_zero_max_attempts_still_tries_once() {
    let mut store = FaultyStore::new();
    let config = CascadeConfig {
        max_attempts: 0,
        ..CascadeConfig::default()
    };

    let model = create_model(&mut store, "Climate", &config).unwrap();
    assert!(model.is_complete());
    assert_eq!(store.update_model_calls.get(), 1);
}
