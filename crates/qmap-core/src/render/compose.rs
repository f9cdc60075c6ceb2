use serde::Serialize;

use super::node::Node;
use crate::errors::{QmapError, Result};
use crate::ops::EntityStore;

/// A position whose element could not be resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DanglingPosition {
    pub position_id: String,
    pub element_id: String,
}

impl From<DanglingPosition> for QmapError {
    fn from(d: DanglingPosition) -> Self {
        QmapError::DanglingReference {
            position_id: d.position_id,
            element_id: d.element_id,
        }
    }
}

/// Nodes of a layout plus any integrity faults found while joining
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Composition {
    pub nodes: Vec<Node>,
    pub dangling: Vec<DanglingPosition>,
}

impl Composition {
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty()
    }
}

/// Compose a layout into render nodes, one per position
///
/// Node order follows position creation order and each node carries its
/// position's coordinates unchanged.
///
/// # Errors
///
/// - `LayoutNotFound` for an unknown layout
/// - `DanglingReference` for the first position whose element is missing
pub fn compose(store: &dyn EntityStore, layout_id: &str) -> Result<Vec<Node>> {
    let composition = compose_partitioned(store, layout_id)?;
    match composition.dangling.into_iter().next() {
        Some(fault) => Err(fault.into()),
        None => Ok(composition.nodes),
    }
}

/// Compose a layout, returning dangling positions instead of failing
///
/// Lets a caller render the consistent part of a layout and surface the
/// faults separately.
///
/// # Errors
///
/// `LayoutNotFound` for an unknown layout; store failures other than a
/// missing element are propagated.
pub fn compose_partitioned(store: &dyn EntityStore, layout_id: &str) -> Result<Composition> {
    store.get_layout(layout_id)?;

    let mut composition = Composition::default();
    for position in store.list_positions(layout_id)? {
        match store.get_element(&position.element_id) {
            Ok(element) => composition
                .nodes
                .push(Node::from_parts(&position, &element)),
            Err(QmapError::ElementNotFound { .. }) => {
                tracing::warn!(
                    layout_id,
                    position_id = %position.id,
                    element_id = %position.element_id,
                    "position references missing element"
                );
                composition.dangling.push(DanglingPosition {
                    position_id: position.id,
                    element_id: position.element_id,
                });
            }
            Err(err) => return Err(err),
        }
    }

    tracing::debug!(
        layout_id,
        node_count = composition.nodes.len(),
        dangling = composition.dangling.len(),
        "layout composed"
    );
    Ok(composition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{create_model, CascadeConfig};
    use crate::entities::position::NewPosition;
    use crate::entities::Position;
    use crate::ops::MemoryStore;

    fn layout_id(store: &mut MemoryStore) -> String {
        let model = create_model(store, "Climate", &CascadeConfig::default()).unwrap();
        model.default_layout_id.unwrap()
    }

    #[test]
    fn test_compose_joins_labels_and_coordinates() {
        let mut store = MemoryStore::new();
        let layout = layout_id(&mut store);
        let temp = store.create_element("Temperature").unwrap();
        let rain = store.create_element("Rainfall").unwrap();
        store
            .create_position(NewPosition::new(&layout, &temp.id, 10.0, 20.0))
            .unwrap();
        store
            .create_position(NewPosition::new(&layout, &rain.id, -5.0, 7.5))
            .unwrap();

        let nodes = compose(&store, &layout).unwrap();

        assert_eq!(
            nodes,
            vec![
                Node {
                    element_id: temp.id,
                    label: "Temperature".to_string(),
                    x: 10.0,
                    y: 20.0,
                },
                Node {
                    element_id: rain.id,
                    label: "Rainfall".to_string(),
                    x: -5.0,
                    y: 7.5,
                },
            ]
        );
    }

    #[test]
    fn test_empty_layout_composes_to_nothing() {
        let mut store = MemoryStore::new();
        let layout = layout_id(&mut store);
        assert!(compose(&store, &layout).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_layout_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            compose(&store, "missing"),
            Err(QmapError::LayoutNotFound { .. })
        ));
    }

    #[test]
    fn test_dangling_position_is_surfaced() {
        let mut store = MemoryStore::new();
        let layout = layout_id(&mut store);
        let ok = store.create_element("Temperature").unwrap();
        store
            .create_position(NewPosition::new(&layout, &ok.id, 0.0, 0.0))
            .unwrap();
        store.insert_position_unchecked(Position::new(
            "p-ghost".to_string(),
            NewPosition::new(&layout, "e-ghost", 1.0, 1.0),
        ));

        let err = compose(&store, &layout).unwrap_err();
        assert_eq!(
            err,
            QmapError::DanglingReference {
                position_id: "p-ghost".to_string(),
                element_id: "e-ghost".to_string(),
            }
        );

        let partitioned = compose_partitioned(&store, &layout).unwrap();
        assert!(!partitioned.is_consistent());
        assert_eq!(partitioned.nodes.len(), 1);
        assert_eq!(partitioned.dangling[0].element_id, "e-ghost");
    }
}
