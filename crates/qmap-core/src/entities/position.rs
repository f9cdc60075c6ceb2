use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position - the placement of one Element at one coordinate in one Layout
///
/// At most one Position exists per `(layout_id, element_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub layout_id: String,
    pub element_id: String,
    pub x: f64,
    pub y: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    pub fn new(id: String, placement: NewPosition) -> Self {
        let now = Utc::now();
        Self {
            id,
            layout_id: placement.layout_id,
            element_id: placement.element_id,
            x: placement.x,
            y: placement.y,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields required by `EntityStore::create_position`
#[derive(Debug, Clone, PartialEq)]
pub struct NewPosition {
    pub layout_id: String,
    pub element_id: String,
    pub x: f64,
    pub y: f64,
}

impl NewPosition {
    pub fn new(layout_id: impl Into<String>, element_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            layout_id: layout_id.into(),
            element_id: element_id.into(),
            x,
            y,
        }
    }
}

/// Coordinate changes accepted by `EntityStore::update_position`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl PositionUpdate {
    pub fn to(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}
