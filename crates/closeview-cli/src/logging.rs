//! stderr logging setup; stdout is reserved for payloads.

use std::env;
use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogFormatArg;

const FALLBACK_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormatArg,
    /// Filter used when `RUST_LOG` is unset.
    pub default_level: String,
}

impl LogConfig {
    pub fn new(format: LogFormatArg, default_level: impl Into<String>) -> Self {
        Self {
            format,
            default_level: default_level.into(),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let from_env = env::var(EnvFilter::DEFAULT_ENV).ok();
        EnvFilter::new(filter_directives(from_env, &self.default_level))
    }
}

/// First parseable of `RUST_LOG`, the configured level, then `warn`.
fn filter_directives(from_env: Option<String>, default_level: &str) -> String {
    from_env
        .into_iter()
        .chain(std::iter::once(default_level.to_owned()))
        .find(|directives| EnvFilter::try_new(directives).is_ok())
        .unwrap_or_else(|| String::from(FALLBACK_LEVEL))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let result = match config.format {
        LogFormatArg::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormatArg::Compact => registry.with(layer.compact()).try_init(),
        LogFormatArg::Json => registry.with(layer.json()).try_init(),
    };

    if let Err(error) = result {
        eprintln!("warning: logging already initialized: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directives_win_over_configured_level() {
        let directives = filter_directives(Some(String::from("closeview=trace")), "info");
        assert_eq!(directives, "closeview=trace");
    }

    #[test]
    fn unparseable_env_falls_back_to_configured_level() {
        let directives = filter_directives(Some(String::from("a=not=a=level")), "debug");
        assert_eq!(directives, "debug");
    }

    #[test]
    fn unparseable_level_falls_back_to_warn() {
        let directives = filter_directives(None, "definitely=not=a=filter");
        assert_eq!(directives, FALLBACK_LEVEL);
    }
}
