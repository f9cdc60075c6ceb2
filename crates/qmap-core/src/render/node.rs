use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::entities::{Element, Position};

/// A display-ready node: one placed Element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub element_id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Node {
    /// Join a position with the element it places
    pub fn from_parts(position: &Position, element: &Element) -> Self {
        Self {
            element_id: element.id.clone(),
            label: element.label.clone(),
            x: position.x,
            y: position.y,
        }
    }

    /// Cytoscape element form: `{"data": {id, label}, "position": {x, y}}`
    pub fn to_cytoscape(&self) -> Value {
        json!({
            "data": { "id": self.element_id, "label": self.label },
            "position": { "x": self.x, "y": self.y },
        })
    }
}

/// Convert a node list for a Cytoscape-style graph surface
pub fn cytoscape_elements(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(Node::to_cytoscape).collect())
}
