//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Time interval settings with seconds or milliseconds resolution.
//!
//! Both kinds store a full [`Duration`] but speak whole units everywhere
//! else: text, fields and the wire carry an unsigned count of seconds or
//! milliseconds. Encoding truncates any sub-unit remainder, so a seconds
//! setting holding 1.5s arrives on the remote node as 1s.
use std::marker::PhantomData;
use std::time::Duration;

use bytes::{Buf, BufMut};
use qe_common::{read_var_u64, write_var_u64, Field};

use crate::errors::{Result, SettingsError};
use crate::setting::{Setting, SettingKind};

/// Resolution of a duration setting.
pub trait TimeUnit {
    const NAME: &'static str;

    fn to_duration(units: u64) -> Duration;

    fn whole_units(duration: &Duration) -> u128;
}

#[derive(Debug, Clone, Copy)]
pub enum Seconds {}

#[derive(Debug, Clone, Copy)]
pub enum Milliseconds {}

impl TimeUnit for Seconds {
    const NAME: &'static str = "Seconds";

    fn to_duration(units: u64) -> Duration {
        Duration::from_secs(units)
    }

    fn whole_units(duration: &Duration) -> u128 {
        u128::from(duration.as_secs())
    }
}

impl TimeUnit for Milliseconds {
    const NAME: &'static str = "Milliseconds";

    fn to_duration(units: u64) -> Duration {
        Duration::from_millis(units)
    }

    fn whole_units(duration: &Duration) -> u128 {
        duration.as_millis()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DurationKind<U>(PhantomData<U>);

pub type SettingSeconds = Setting<DurationKind<Seconds>>;
pub type SettingMilliseconds = Setting<DurationKind<Milliseconds>>;

fn units_of<U: TimeUnit>(duration: &Duration) -> Result<u64> {
    let units = U::whole_units(duration);
    u64::try_from(units).map_err(|_| SettingsError::Overflow {
        setting: U::NAME,
        detail: format!("{units} units exceed the unsigned 64-bit range"),
    })
}

impl<U: TimeUnit> SettingKind for DurationKind<U> {
    type Value = Duration;

    const NAME: &'static str = U::NAME;

    fn from_field(field: &Field) -> Result<Duration> {
        field
            .as_u64()
            .map(U::to_duration)
            .map_err(|err| SettingsError::type_mismatch(Self::NAME, err))
    }

    fn to_field(value: &Duration) -> Result<Field> {
        Ok(Field::UInt64(units_of::<U>(value)?))
    }

    fn parse(text: &str) -> Result<Duration> {
        text.parse::<u64>()
            .map(U::to_duration)
            .map_err(|err| SettingsError::parse(Self::NAME, text, err))
    }

    fn render(value: &Duration) -> Result<String> {
        Ok(units_of::<U>(value)?.to_string())
    }

    fn decode<B: Buf + ?Sized>(buf: &mut B) -> Result<Duration> {
        Ok(U::to_duration(read_var_u64(buf)?))
    }

    fn encode<B: BufMut + ?Sized>(value: &Duration, buf: &mut B) -> Result<()> {
        Ok(write_var_u64(units_of::<U>(value)?, buf)?)
    }
}

impl SettingSeconds {
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn set_secs(&mut self, secs: u64) {
        self.set(Duration::from_secs(secs));
    }

    /// Whole seconds, dropping any fractional part.
    pub fn total_seconds(&self) -> u64 {
        self.value().as_secs()
    }
}

impl SettingMilliseconds {
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn set_millis(&mut self, millis: u64) {
        self.set(Duration::from_millis(millis));
    }

    /// Whole milliseconds, dropping any sub-millisecond part.
    pub fn total_milliseconds(&self) -> u128 {
        self.value().as_millis()
    }
}

impl From<Duration> for SettingSeconds {
    fn from(value: Duration) -> Self {
        Self::new(value)
    }
}

impl From<Duration> for SettingMilliseconds {
    fn from(value: Duration) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn round_trip<U: TimeUnit>(setting: &Setting<DurationKind<U>>) -> Setting<DurationKind<U>> {
        let mut buf = Vec::new();
        setting.write_to(&mut buf).expect("vec grows");
        let mut restored = Setting::<DurationKind<U>>::default();
        restored.read_from(&mut buf.as_slice()).expect("decode");
        restored
    }

    #[test]
    fn constructors_scale_units() {
        let timeout = SettingSeconds::from_secs(300);
        assert_eq!(timeout.get(), Duration::from_secs(300));
        assert_eq!(timeout.total_seconds(), 300);
        assert!(!timeout.is_changed());

        let poll = SettingMilliseconds::from_millis(1_500);
        assert_eq!(poll.get(), Duration::from_millis(1_500));
        assert_eq!(poll.total_milliseconds(), 1_500);
    }

    #[test]
    fn seconds_wire_truncates_sub_second_precision() {
        let mut timeout = SettingSeconds::default();
        timeout.set(Duration::from_millis(1_500));

        let mut buf = Vec::new();
        timeout.write_to(&mut buf).expect("vec grows");
        assert_eq!(buf, vec![1]);

        let restored = round_trip(&timeout);
        assert_eq!(restored.get(), Duration::from_secs(1));
        assert!(restored.is_changed());
    }

    #[test]
    fn milliseconds_wire_keeps_millisecond_precision() {
        let mut poll = SettingMilliseconds::default();
        poll.set(Duration::from_micros(2_500_750));
        let restored = round_trip(&poll);
        assert_eq!(restored.get(), Duration::from_millis(2_500));
        assert_eq!(restored.total_milliseconds(), 2_500);
    }

    #[test]
    fn whole_unit_values_round_trip_exactly() {
        for secs in [0, 1, 59, 86_400, u64::MAX] {
            let restored = round_trip(&SettingSeconds::from_secs(secs));
            assert_eq!(restored.total_seconds(), secs);
        }
        for millis in [0, 1, 999, 3_600_000, u64::MAX] {
            let restored = round_trip(&SettingMilliseconds::from_millis(millis));
            assert_eq!(restored.get(), Duration::from_millis(millis));
        }
    }

    #[test]
    fn text_and_field_speak_whole_units() {
        let mut timeout = SettingSeconds::default();
        timeout.set_text("30").expect("integer text");
        assert_eq!(timeout.get(), Duration::from_secs(30));
        assert_eq!(timeout.to_text().expect("render"), "30");

        let mut poll = SettingMilliseconds::default();
        poll.set_field(&Field::from(250u64)).expect("unsigned field");
        assert_eq!(poll.get(), Duration::from_millis(250));
        assert_eq!(poll.to_field().expect("field"), Field::UInt64(250));
    }

    #[test]
    fn non_unsigned_fields_are_type_mismatches() {
        let mut timeout = SettingSeconds::default();
        for field in [Field::from("30"), Field::from(30.0f64), Field::from(30i64)] {
            let err = timeout.set_field(&field).expect_err("needs UInt64");
            assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        }
        assert!(!timeout.is_changed());
    }

    #[test]
    fn fractional_text_is_rejected() {
        let mut timeout = SettingSeconds::default();
        let err = timeout.set_text("1.5").expect_err("whole seconds only");
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn oversized_millisecond_duration_overflows_on_encode() {
        let mut poll = SettingMilliseconds::default();
        poll.set(Duration::from_secs(u64::MAX));
        let mut buf = Vec::new();
        let err = poll.write_to(&mut buf).expect_err("does not fit in u64 ms");
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert!(buf.is_empty());
    }
}
