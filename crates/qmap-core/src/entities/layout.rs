use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout - one spatial arrangement belonging to exactly one Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    pub label: String,

    /// Owning model; immutable after creation
    pub model_id: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Layout {
    pub fn new(id: String, label: String, model_id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            label,
            model_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field changes accepted by `EntityStore::update_layout`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutUpdate {
    pub label: Option<String>,
}
