//! Structured logging setup
//!
//! Logs always go to stderr so stdout stays free for step outputs and
//! JSON results.

use std::str::FromStr;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Filter used when neither `GHINVITE_LOG` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "info";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(crate::Error::Config(format!(
                "Invalid log format '{}': expected pretty or json",
                other
            ))),
        }
    }
}

/// Filter directive from the environment
fn filter_directive() -> String {
    std::env::var("GHINVITE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Initialize the global subscriber once.
///
/// Later calls are no-ops, and an already-installed subscriber (for
/// example from a test harness) is left in place.
pub fn init_logging(format: LogFormat) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_new(filter_directive()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let layer = match format {
            LogFormat::Pretty => fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed(),
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
