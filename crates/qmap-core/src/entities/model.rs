use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model - a named qualitative map
///
/// A Model owns one or more Layouts. `default_layout_id` is only `None`
/// while the model cascade is in flight, or when a failed cascade could not
/// be compensated (see `is_complete`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Store-assigned identifier (UUID v7)
    pub id: String,

    pub label: String,

    /// The Layout shown when the model is first selected
    pub default_layout_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Create a model without a default layout
    pub fn new(id: String, label: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            label,
            default_layout_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once the model points at its default layout
    pub fn is_complete(&self) -> bool {
        self.default_layout_id.is_some()
    }
}

/// Field changes accepted by `EntityStore::update_model`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelUpdate {
    pub label: Option<String>,
    pub default_layout_id: Option<String>,
}

impl ModelUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn default_layout(layout_id: impl Into<String>) -> Self {
        Self {
            default_layout_id: Some(layout_id.into()),
            ..Self::default()
        }
    }
}
