//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Counter and floating point settings.
use bytes::{Buf, BufMut};
use qe_common::{read_string, read_var_u64, write_string, write_var_u64, Field};

use crate::errors::{Result, SettingsError};
use crate::setting::{Setting, SettingKind};

/// Unsigned 64-bit counter, sent over the wire as a varint.
#[derive(Debug, Clone, Copy)]
pub struct UInt64Kind;

/// Counters, limits and sizes.
pub type SettingUInt64 = Setting<UInt64Kind>;

/// Booleans are counters holding `0` or `1`.
pub type SettingBool = SettingUInt64;

impl SettingKind for UInt64Kind {
    type Value = u64;

    const NAME: &'static str = "UInt64";

    fn from_field(field: &Field) -> Result<u64> {
        field
            .as_u64()
            .map_err(|err| SettingsError::type_mismatch(Self::NAME, err))
    }

    fn to_field(value: &u64) -> Result<Field> {
        Ok(Field::UInt64(*value))
    }

    fn parse(text: &str) -> Result<u64> {
        text.parse::<u64>()
            .map_err(|err| SettingsError::parse(Self::NAME, text, err))
    }

    fn render(value: &u64) -> Result<String> {
        Ok(value.to_string())
    }

    fn decode<B: Buf + ?Sized>(buf: &mut B) -> Result<u64> {
        Ok(read_var_u64(buf)?)
    }

    fn encode<B: BufMut + ?Sized>(value: &u64, buf: &mut B) -> Result<()> {
        Ok(write_var_u64(*value, buf)?)
    }
}

impl SettingUInt64 {
    /// Truthiness of a boolean flag; any non-zero value is `true`.
    pub fn as_bool(&self) -> bool {
        self.get() != 0
    }

    pub fn set_bool(&mut self, enabled: bool) {
        self.set(u64::from(enabled));
    }
}

impl From<u64> for SettingUInt64 {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Single precision threshold.
///
/// Floats travel as their decimal text wrapped in the string encoding, never
/// as raw IEEE bits.
#[derive(Debug, Clone, Copy)]
pub struct Float32Kind;

pub type SettingFloat = Setting<Float32Kind>;

impl SettingKind for Float32Kind {
    type Value = f32;

    const NAME: &'static str = "Float32";

    /// Accepts any numeric tag and narrows it to `f32`.
    fn from_field(field: &Field) -> Result<f32> {
        let wide = field
            .coerce_f64()
            .map_err(|err| SettingsError::type_mismatch(Self::NAME, err))?;
        Ok(wide as f32)
    }

    fn to_field(value: &f32) -> Result<Field> {
        Ok(Field::Float64(f64::from(*value)))
    }

    fn parse(text: &str) -> Result<f32> {
        text.parse::<f32>()
            .map_err(|err| SettingsError::parse(Self::NAME, text, err))
    }

    fn render(value: &f32) -> Result<String> {
        Ok(value.to_string())
    }

    fn decode<B: Buf + ?Sized>(buf: &mut B) -> Result<f32> {
        let text = read_string(buf)?;
        Self::parse(&text)
    }

    fn encode<B: BufMut + ?Sized>(value: &f32, buf: &mut B) -> Result<()> {
        Ok(write_string(&Self::render(value)?, buf)?)
    }
}

impl From<f32> for SettingFloat {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}
