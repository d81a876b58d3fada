//! ---
//! qe_section: "01-core-functionality"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Shared primitives and utilities for the query engine runtime."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Core shared primitives for the query engine workspace.
//! This crate exposes the dynamically typed [`Field`] value, the varint based
//! binary wire codec used between nodes, and the tracing bootstrap.
#![warn(missing_docs)]

pub mod field;
pub mod logging;
pub mod wire;

pub use field::{Field, FieldType, FieldTypeError};
pub use logging::{init, init_tracing, LogFormat, LoggingConfig};
pub use wire::{
    read_string, read_var_u64, var_u64_len, write_string, write_var_u64, WireError,
    MAX_STRING_SIZE,
};
