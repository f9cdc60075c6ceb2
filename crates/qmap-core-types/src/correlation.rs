//! Correlation ids for tying log events and errors to one user action
//!
//! A caller creates one `RequestContext` per action (one CLI invocation,
//! one UI command) and attaches it to errors and log spans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh time-ordered id (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Id of a single request
    RequestId
);

correlation_id!(
    /// Id handed in by an outer caller spanning several requests
    TraceId
);

/// Ids carried across an operation boundary
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Fresh request id, joined to an outer trace when `trace` is non-blank
    pub fn continuing(trace: Option<String>) -> Self {
        let ctx = Self::new();
        match trace.filter(|t| !t.trim().is_empty()) {
            Some(t) => ctx.with_trace_id(TraceId::from(t)),
            None => ctx,
        }
    }
}
