//! Subscriber installation
//!
//! Binaries call [`init`] once; libraries never install a subscriber.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output format and default verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Text lines, `debug` and up
    Development,
    /// One JSON object per event, `info` and up
    Production,
    /// No output; tests attach a capture layer instead
    Test,
}

impl Profile {
    /// Parse a profile name as given on the command line
    ///
    /// Unknown names fall back to `Development`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "production" | "prod" | "json" => Profile::Production,
            "test" => Profile::Test,
            _ => Profile::Development,
        }
    }

    fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "rowpatch=debug",
            Profile::Production => "rowpatch=info",
            Profile::Test => "rowpatch=trace",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at application startup; later calls are ignored. `RUST_LOG`
/// overrides the profile's default filter.
///
/// # Profiles
///
/// - **Development**: Human-readable logs on stderr with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Bare registry; capture is installed via `init_test_capture()`
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}
