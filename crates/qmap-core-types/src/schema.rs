//! Canonical schema constants for structured logging and events
//!
//! Field names emitted by the logging macros and the catalog operations.
//! The capture layer and the logging tests read events through these names.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_LABEL: &str = "label";

// Entity identifiers
pub const FIELD_MODEL_ID: &str = "model_id";
pub const FIELD_LAYOUT_ID: &str = "layout_id";
pub const FIELD_ELEMENT_ID: &str = "element_id";

// Collection sizes
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_LAYOUT_COUNT: &str = "layout_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_entity_fields_are_distinct() {
        let fields = [
            FIELD_MODEL_ID,
            FIELD_LAYOUT_ID,
            FIELD_ELEMENT_ID,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in fields.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
