//! ---
//! qe_section: "03-persistence-logging"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Structured logging bootstrap shared by query engine components."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "QE_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceCell<LogFormat> = OnceCell::new();

/// Available output formats for the tracing subscriber.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Human-oriented multi-field output.
    #[default]
    Pretty,
    /// One JSON object per event.
    StructuredJson,
}

/// Logging section of a component configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Explicit filter directive; overrides the environment when present.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Install a pretty subscriber suitable for development and tests.
///
/// Safe to call repeatedly; only the first call installs anything.
pub fn init() {
    let _ = init_tracing(&LoggingConfig::default());
}

/// Install the global subscriber described by `config`.
///
/// The filter is taken from `config.filter`, then `QE_LOG`, then `RUST_LOG`,
/// finally defaulting to `info`.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let filter = resolve_filter(config)?;

    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
        LogFormat::StructuredJson => fmt::layer().with_target(false).json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();

    if INSTALLED.set(config.format).is_ok() {
        info!(format = ?config.format, "tracing initialised");
    }
    Ok(())
}

fn resolve_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Some(directive) = &config.filter {
        return EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter directive '{directive}'"));
    }
    match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive)
            .with_context(|| format!("invalid {LOG_ENV} directive '{directive}'")),
        Err(_) => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        tracing::debug!(kind = "test", "subscriber accepts events");
    }

    #[test]
    fn invalid_explicit_filter_is_reported() {
        let config = LoggingConfig {
            format: LogFormat::StructuredJson,
            filter: Some("qe_settings=verbose".into()),
        };
        let err = resolve_filter(&config).expect_err("malformed directive");
        assert!(err.to_string().contains("invalid log filter directive"));
    }

    #[test]
    fn config_reads_kebab_case_format() {
        let config: LoggingConfig =
            toml::from_str("format = \"structured-json\"\nfilter = \"debug\"").expect("parse");
        assert_eq!(config.format, LogFormat::StructuredJson);
        assert_eq!(config.filter.as_deref(), Some("debug"));

        let defaults: LoggingConfig = toml::from_str("").expect("empty document");
        assert_eq!(defaults, LoggingConfig::default());
    }
}
