//! Subcommand implementations and the context they share

pub mod element;
pub mod layout;
pub mod model;
pub mod position;
pub mod render;

use std::path::{Path, PathBuf};

use qmap_core::errors::{ExError, ExErrorKind, QmapError};
use qmap_core::logging_facility;
use qmap_core_types::RequestContext;
use qmap_engine::QmapConfig;
use qmap_store::SqliteStore;
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Configuration resolved from `--config` and `--db`, plus the
/// correlation ids of this invocation
pub struct Context {
    pub config: QmapConfig,
    pub request: RequestContext,
}

impl Context {
    /// Load the configuration and start logging
    pub fn load(
        config_path: Option<&Path>,
        db: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = QmapConfig::load_or_default(config_path).map_err(ExError::from)?;
        if let Some(db) = db {
            config.store.path = db;
        }
        logging_facility::init(config.logging.profile);
        Ok(Self {
            config,
            request: RequestContext::continuing(std::env::var("QMAP_TRACE_ID").ok()),
        })
    }

    pub fn open_store(&self) -> Result<SqliteStore, ExError> {
        self.config.open_store().map_err(|e| self.fail(e))
    }

    /// Structured form of `err`, tagged with this invocation's ids
    pub fn fail(&self, err: QmapError) -> ExError {
        ExError::from(err).with_context(&self.request)
    }
}

/// Print a value as pretty JSON on stdout
///
/// A value that cannot be encoded is a bug in the command, reported as
/// `ERR_INTERNAL`.
pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("print_json")
            .with_message(e.to_string())
    })?;
    println!("{}", json);
    Ok(())
}
