use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Element - a named node that can appear in any Layout of any Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Element {
    pub fn new(id: String, label: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            label,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field changes accepted by `EntityStore::update_element`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    pub label: Option<String>,
}
