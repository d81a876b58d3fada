//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
use qe_common::{FieldTypeError, WireError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Closed classification of [`SettingsError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    TypeMismatch,
    UnknownMode,
    IllegalModeForContext,
    #[strum(serialize = "parse_error")]
    Parse,
    OutOfDeclaredRange,
    Overflow,
    #[strum(serialize = "stream_failure")]
    Stream,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("bad type of setting {setting}: {source}")]
    TypeMismatch {
        setting: &'static str,
        #[source]
        source: FieldTypeError,
    },
    #[error("unknown {label}: '{token}', must be one of {}", quoted(.accepted))]
    UnknownMode {
        label: &'static str,
        token: String,
        accepted: Vec<&'static str>,
    },
    #[error("illegal {label}: '{token}' is not allowed in this context, must be one of {}", quoted(.accepted))]
    IllegalModeForContext {
        label: &'static str,
        token: String,
        accepted: Vec<&'static str>,
    },
    #[error("cannot parse '{text}' as {setting}: {reason}")]
    Parse {
        setting: &'static str,
        text: String,
        reason: String,
    },
    #[error("{label} ordinal {ordinal} is outside the declared range 0..{len}")]
    OutOfDeclaredRange {
        label: &'static str,
        ordinal: u64,
        len: usize,
    },
    #[error("value of {setting} does not fit its wire representation: {detail}")]
    Overflow {
        setting: &'static str,
        detail: String,
    },
    #[error("stream failure: {0}")]
    Stream(#[from] WireError),
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettingsError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            SettingsError::UnknownMode { .. } => ErrorKind::UnknownMode,
            SettingsError::IllegalModeForContext { .. } => ErrorKind::IllegalModeForContext,
            SettingsError::Parse { .. } => ErrorKind::Parse,
            SettingsError::OutOfDeclaredRange { .. } => ErrorKind::OutOfDeclaredRange,
            SettingsError::Overflow { .. } => ErrorKind::Overflow,
            SettingsError::Stream(_) => ErrorKind::Stream,
        }
    }

    pub(crate) fn type_mismatch(setting: &'static str, source: FieldTypeError) -> Self {
        SettingsError::TypeMismatch { setting, source }
    }

    pub(crate) fn parse(
        setting: &'static str,
        text: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        SettingsError::Parse {
            setting,
            text: text.to_owned(),
            reason: reason.to_string(),
        }
    }
}

fn quoted(tokens: &[&'static str]) -> String {
    tokens
        .iter()
        .map(|token| format!("'{token}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
