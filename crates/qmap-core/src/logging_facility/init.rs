//! Logging initialization

use serde::Deserialize;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output for development
    #[default]
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call in a process has an effect. `RUST_LOG` overrides the
/// profile's default filter.
///
/// - **Development**: human-readable logs, `qmap=debug`
/// - **Production**: JSON logs, `qmap=info`
/// - **Test**: the in-memory capture subscriber (see `init_test_capture()`)
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("qmap=debug")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("qmap=info")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Test => {
            super::test_capture::init_test_capture();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
    }

    #[test]
    fn test_profile_defaults_to_development() {
        assert_eq!(Profile::default(), Profile::Development);
    }
}
