//! Element placement: create an Element and place it in the active layout
//! in one step, so a placement always yields a visible node.

use serde::Deserialize;

use crate::entities::position::NewPosition;
use crate::entities::Position;
use crate::errors::{QmapError, Result};
use crate::ops::{validation, EntityStore};
use crate::render::Node;

/// Where a newly placed element lands
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Always the origin `(0, 0)`
    #[default]
    Origin,
    /// First free cell of a row-major grid anchored at the origin
    Grid { spacing: f64, columns: u32 },
}

impl PlacementStrategy {
    /// Check the strategy parameters
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive or non-finite grid spacing.
    pub fn validate(&self) -> Result<()> {
        match self {
            PlacementStrategy::Origin => Ok(()),
            PlacementStrategy::Grid { spacing, .. } => {
                if spacing.is_finite() && *spacing > 0.0 {
                    Ok(())
                } else {
                    Err(QmapError::validation(
                        "placement.spacing",
                        format!("must be a positive number, got {}", spacing),
                    ))
                }
            }
        }
    }

    /// Coordinate for the next element given the layout's current positions
    ///
    /// # Errors
    ///
    /// `Validation` if the strategy parameters are invalid.
    pub fn next_coordinate(&self, occupied: &[Position]) -> Result<(f64, f64)> {
        self.validate()?;
        match self {
            PlacementStrategy::Origin => Ok((0.0, 0.0)),
            PlacementStrategy::Grid { spacing, columns } => {
                let columns = (*columns).max(1) as usize;
                let half = spacing / 2.0;
                let taken = |x: f64, y: f64| {
                    occupied
                        .iter()
                        .any(|p| (p.x - x).abs() < half && (p.y - y).abs() < half)
                };

                // One more cell than there are positions is always enough
                let cell = (0..=occupied.len())
                    .map(|i| {
                        let col = (i % columns) as f64;
                        let row = (i / columns) as f64;
                        (col * spacing, row * spacing)
                    })
                    .find(|&(x, y)| !taken(x, y))
                    .unwrap_or((0.0, 0.0));
                Ok(cell)
            }
        }
    }
}

/// Create an Element and place it in `layout_id`
///
/// All preconditions are checked before anything is written. If creating
/// the Position fails, the new Element is deleted again.
///
/// # Errors
///
/// - `PreconditionFailed` when no layout is given or it does not exist
/// - `Validation` for a blank label or invalid strategy
/// - store errors from the create calls
pub fn place_new_element(
    store: &mut dyn EntityStore,
    label: &str,
    layout_id: Option<&str>,
    strategy: &PlacementStrategy,
) -> Result<Node> {
    let layout_id = layout_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| QmapError::precondition("no active layout selected"))?;

    match store.get_layout(layout_id) {
        Ok(_) => {}
        Err(QmapError::LayoutNotFound { .. }) => {
            return Err(QmapError::precondition(format!(
                "active layout {} does not exist",
                layout_id
            )));
        }
        Err(err) => return Err(err),
    }
    validation::label("label", label)?;

    let (x, y) = strategy.next_coordinate(&store.list_positions(layout_id)?)?;

    let element = store.create_element(label)?;
    let position = match store.create_position(NewPosition::new(layout_id, &element.id, x, y)) {
        Ok(position) => position,
        Err(err) => {
            if let Err(cleanup) = store.delete_element(&element.id) {
                tracing::warn!(element_id = %element.id, error = %cleanup, "unplaced element left behind");
            }
            return Err(err);
        }
    };

    tracing::debug!(element_id = %element.id, layout_id, x, y, "element placed");
    Ok(Node::from_parts(&position, &element))
}
