//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Typed runtime settings for the distributed query engine.
//!
//! Each [`Setting`] holds a value and remembers whether it was explicitly
//! assigned. Values can be assigned natively, from a [`qe_common::Field`],
//! from text, or from the binary wire format, and written back to text and
//! to the wire. Only changed settings are meant to be forwarded to remote
//! execution nodes.

pub mod duration;
pub mod errors;
pub mod mode;
pub mod modes;
pub mod scalar;
pub mod setting;

pub use duration::{
    DurationKind, Milliseconds, Seconds, SettingMilliseconds, SettingSeconds, TimeUnit,
};
pub use errors::{ErrorKind, Result, SettingsError};
pub use mode::{Mode, ModeKind, ModePolicy, Unrestricted};
pub use modes::{
    LoadBalancing, OverflowMode, OverflowPolicy, SettingLoadBalancing, SettingOverflowMode,
    SettingOverflowModeGroupBy, SettingTotalsMode, TotalsMode,
};
pub use scalar::{Float32Kind, SettingBool, SettingFloat, SettingUInt64, UInt64Kind};
pub use setting::{Setting, SettingKind};
