//! Log output for the estate node.
//!
//! Logs always go to stderr: the daemon's stdout carries command replies
//! only. `RUST_LOG` takes precedence over the configured level. Closing
//! `mutation` and `command` spans are logged with their busy/idle time, so
//! every operation leaves one timing line at the configured level.

use std::str::FromStr;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::NodeError;

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}, expected \"human\" or \"json\"")),
        }
    }
}

/// Parse a level directive such as `"info"` or `"warn,estate_valuation=debug"`.
pub fn parse_filter(level: &str) -> Result<EnvFilter, NodeError> {
    EnvFilter::try_new(level).map_err(|e| NodeError::Config(format!("log level {level:?}: {e}")))
}

/// Install the global subscriber.
///
/// Fails if `level` does not parse (and `RUST_LOG` is unset) or a global
/// subscriber is already installed.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), NodeError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(level)?,
    };

    let output = match format {
        LogFormat::Human => fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|e| NodeError::Config(format!("logging already initialised: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("human".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn level_directives() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("warn,estate_valuation=debug").is_ok());
        assert!(matches!(
            parse_filter("estate_node=loudest"),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn second_init_is_an_error() {
        init_logging(LogFormat::Json, "warn").unwrap();
        assert!(init_logging(LogFormat::Human, "info").is_err());
    }
}
