use qmap_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

/// Result type alias using QmapError
pub type Result<T> = std::result::Result<T, QmapError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the presentation
/// layer, the CLI, tests) can match on without depending on the concrete
/// `QmapError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// A required field is absent or malformed
    Validation,
    /// A referenced id does not exist
    NotFound,
    /// A uniqueness rule would be broken
    Conflict,
    /// A Position references an Element that no longer exists
    DanglingReference,
    /// The operation needs state that is not there (e.g. no active layout)
    PreconditionFailed,
    /// Model creation failed after the Model row was written
    PartialCascadeFailure,

    // Integration/IO
    Persistence,
    Config,

    /// A bug rather than bad input or failing IO
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::DanglingReference => "ERR_DANGLING_REFERENCE",
            ExErrorKind::PreconditionFailed => "ERR_PRECONDITION_FAILED",
            ExErrorKind::PartialCascadeFailure => "ERR_PARTIAL_CASCADE_FAILURE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context for log events and
/// caller-facing reports.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    related_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            related_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the id of the entity the error is about
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add a second id involved in the failure (the layout of a position, ...)
    pub fn with_related_id(mut self, id: impl Into<String>) -> Self {
        self.related_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attach the request and trace ids of `ctx`
    pub fn with_context(self, ctx: &RequestContext) -> Self {
        let ex = self.with_request_id(ctx.request_id.clone());
        match &ctx.trace_id {
            Some(trace_id) => ex.with_trace_id(trace_id.clone()),
            None => ex,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn related_id(&self) -> Option<&str> {
        self.related_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(related_id) = &self.related_id {
            write!(f, " (related_id: {})", related_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        if let Some(trace_id) = &self.trace_id {
            write!(f, " (trace_id: {})", trace_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Saga step of the model cascade that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    /// Step 2: creating the default Layout
    CreateDefaultLayout,
    /// Step 3: pointing the Model at its default Layout
    LinkDefaultLayout,
}

impl std::fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CascadeStep::CreateDefaultLayout => write!(f, "create_default_layout"),
            CascadeStep::LinkDefaultLayout => write!(f, "link_default_layout"),
        }
    }
}

/// Error taxonomy for qmap operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QmapError {
    // ===== Lookup Errors =====
    #[error("Model not found: {model_id}")]
    ModelNotFound { model_id: String },

    #[error("Element not found: {element_id}")]
    ElementNotFound { element_id: String },

    #[error("Layout not found: {layout_id}")]
    LayoutNotFound { layout_id: String },

    #[error("Position not found: {position_id}")]
    PositionNotFound { position_id: String },

    // ===== Validation Errors =====
    /// A required field is missing or malformed
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The layout chosen as default belongs to another model
    #[error("Layout {layout_id} does not belong to model {model_id}")]
    DefaultLayoutMismatch { model_id: String, layout_id: String },

    // ===== Consistency Errors =====
    /// An element may appear at most once per layout
    #[error("Element {element_id} is already placed in layout {layout_id}")]
    PositionConflict {
        layout_id: String,
        element_id: String,
    },

    /// Removing a model's default layout would leave the model without one
    #[error("Layout {layout_id} is the default layout of model {model_id}")]
    DefaultLayoutInUse { layout_id: String, model_id: String },

    /// A position points at an element that does not exist
    #[error("Position {position_id} references missing element {element_id}")]
    DanglingReference {
        position_id: String,
        element_id: String,
    },

    #[error("Precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    /// Model creation failed part way through
    ///
    /// `compensated` is true when the partially-created model was removed
    /// again; when false the model is still stored without a default layout.
    #[error("Creating model {model_id} failed at step {step}: {source}")]
    PartialCascadeFailure {
        model_id: String,
        layout_id: Option<String>,
        step: CascadeStep,
        compensated: bool,
        #[source]
        source: Box<QmapError>,
    },

    // ===== Integration Errors =====
    #[error("Persistence failure in {op}: {message}")]
    Persistence { op: String, message: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl QmapError {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        QmapError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        QmapError::PreconditionFailed {
            reason: reason.into(),
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            QmapError::ModelNotFound { .. }
            | QmapError::ElementNotFound { .. }
            | QmapError::LayoutNotFound { .. }
            | QmapError::PositionNotFound { .. } => ExErrorKind::NotFound,
            QmapError::Validation { .. } | QmapError::DefaultLayoutMismatch { .. } => {
                ExErrorKind::Validation
            }
            QmapError::PositionConflict { .. } => ExErrorKind::Conflict,
            QmapError::DanglingReference { .. } => ExErrorKind::DanglingReference,
            QmapError::DefaultLayoutInUse { .. } | QmapError::PreconditionFailed { .. } => {
                ExErrorKind::PreconditionFailed
            }
            QmapError::PartialCascadeFailure { .. } => ExErrorKind::PartialCascadeFailure,
            QmapError::Persistence { .. } => ExErrorKind::Persistence,
            QmapError::Config { .. } => ExErrorKind::Config,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ExErrorKind::NotFound
    }
}

/// Convert QmapError to ExError
impl From<QmapError> for ExError {
    fn from(err: QmapError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let ex = ExError::new(kind);

        let ex = match err {
            QmapError::ModelNotFound { model_id } => ex.with_entity_id(model_id),
            QmapError::ElementNotFound { element_id } => ex.with_entity_id(element_id),
            QmapError::LayoutNotFound { layout_id } => ex.with_entity_id(layout_id),
            QmapError::PositionNotFound { position_id } => ex.with_entity_id(position_id),

            QmapError::Validation { .. } | QmapError::PreconditionFailed { .. } => ex,

            QmapError::DefaultLayoutMismatch {
                model_id,
                layout_id,
            } => ex.with_entity_id(model_id).with_related_id(layout_id),

            QmapError::PositionConflict {
                layout_id,
                element_id,
            } => ex.with_entity_id(element_id).with_related_id(layout_id),

            QmapError::DefaultLayoutInUse {
                layout_id,
                model_id,
            } => ex.with_entity_id(layout_id).with_related_id(model_id),

            QmapError::DanglingReference {
                position_id,
                element_id,
            } => ex.with_entity_id(position_id).with_related_id(element_id),

            QmapError::PartialCascadeFailure {
                model_id,
                layout_id,
                source,
                ..
            } => {
                let ex = ex
                    .with_entity_id(model_id)
                    .with_source(ExError::from(*source));
                match layout_id {
                    Some(id) => ex.with_related_id(id),
                    None => ex,
                }
            }

            QmapError::Persistence { op, .. } => ex.with_op(op),

            QmapError::Config { .. } => ex,
        };
        ex.with_message(message)
    }
}
