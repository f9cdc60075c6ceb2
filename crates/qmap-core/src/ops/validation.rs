//! Field validation shared by every `EntityStore` implementation

use crate::entities::position::{NewPosition, PositionUpdate};
use crate::errors::{QmapError, Result};

/// Validate a label and return it trimmed
///
/// # Errors
///
/// `Validation` if the label is empty or whitespace-only.
pub fn label(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QmapError::validation(
            field,
            "cannot be empty or whitespace-only",
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a reference id (non-empty)
///
/// # Errors
///
/// `Validation` if the id is empty.
pub fn reference(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QmapError::validation(field, "is required"));
    }
    Ok(())
}

/// Validate a coordinate
///
/// # Errors
///
/// `Validation` for NaN or infinite values.
pub fn coordinate(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(QmapError::validation(
            field,
            format!("must be a finite number, got {}", value),
        ));
    }
    Ok(())
}

/// Validate all fields of a new position
///
/// # Errors
///
/// `Validation` naming the first offending field.
pub fn new_position(position: &NewPosition) -> Result<()> {
    reference("layout_id", &position.layout_id)?;
    reference("element_id", &position.element_id)?;
    coordinate("x", position.x)?;
    coordinate("y", position.y)
}

/// Validate the coordinates present in a position update
///
/// # Errors
///
/// `Validation` for a non-finite coordinate.
pub fn position_update(update: &PositionUpdate) -> Result<()> {
    if let Some(x) = update.x {
        coordinate("x", x)?;
    }
    if let Some(y) = update.y {
        coordinate("y", y)?;
    }
    Ok(())
}
