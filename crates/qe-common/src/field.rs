//! ---
//! qe_section: "01-core-functionality"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Shared primitives and utilities for the query engine runtime."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag carried by every [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Unsigned 64-bit integer.
    UInt64,
    /// Signed 64-bit integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
}

impl FieldType {
    /// Stable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::UInt64 => "UInt64",
            FieldType::Int64 => "Int64",
            FieldType::Float64 => "Float64",
            FieldType::String => "String",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a [`Field`] does not hold the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bad type of field: expected {expected}, got {actual}")]
pub struct FieldTypeError {
    /// Human-readable description of the accepted type(s).
    pub expected: &'static str,
    /// Tag actually carried by the field.
    pub actual: FieldType,
}

/// Dynamically typed value used as the common currency for loosely typed
/// configuration input.
///
/// Deserialization is untagged: non-negative integers land in
/// [`Field::UInt64`], negative integers in [`Field::Int64`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// Signed 64-bit integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
}

impl Field {
    /// Tag of the value currently held.
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::UInt64(_) => FieldType::UInt64,
            Field::Int64(_) => FieldType::Int64,
            Field::Float64(_) => FieldType::Float64,
            Field::String(_) => FieldType::String,
        }
    }

    /// Shorthand for `self.field_type().name()`.
    pub fn type_name(&self) -> &'static str {
        self.field_type().name()
    }

    /// Return the unsigned payload or fail on any other tag.
    pub fn as_u64(&self) -> Result<u64, FieldTypeError> {
        match self {
            Field::UInt64(v) => Ok(*v),
            other => Err(other.mismatch("UInt64")),
        }
    }

    /// Return the signed payload or fail on any other tag.
    pub fn as_i64(&self) -> Result<i64, FieldTypeError> {
        match self {
            Field::Int64(v) => Ok(*v),
            other => Err(other.mismatch("Int64")),
        }
    }

    /// Return the floating point payload or fail on any other tag.
    pub fn as_f64(&self) -> Result<f64, FieldTypeError> {
        match self {
            Field::Float64(v) => Ok(*v),
            other => Err(other.mismatch("Float64")),
        }
    }

    /// Borrow the string payload or fail on any other tag.
    pub fn as_str(&self) -> Result<&str, FieldTypeError> {
        match self {
            Field::String(v) => Ok(v.as_str()),
            other => Err(other.mismatch("String")),
        }
    }

    /// Widen any numeric tag to `f64`, rejecting strings.
    ///
    /// Integers above 2^53 lose precision the same way an `as` cast does.
    pub fn coerce_f64(&self) -> Result<f64, FieldTypeError> {
        match self {
            Field::UInt64(v) => Ok(*v as f64),
            Field::Int64(v) => Ok(*v as f64),
            Field::Float64(v) => Ok(*v),
            Field::String(_) => Err(self.mismatch("UInt64, Int64 or Float64")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> FieldTypeError {
        FieldTypeError {
            expected,
            actual: self.field_type(),
        }
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Field::UInt64(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Int64(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Float64(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::String(value.to_owned())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::String(value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::UInt64(v) => write!(f, "{v}"),
            Field::Int64(v) => write!(f, "{v}"),
            Field::Float64(v) => write!(f, "{v}"),
            Field::String(v) => write!(f, "'{v}'"),
        }
    }
}
