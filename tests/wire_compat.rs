//! ---
//! qe_section: "15-testing-qa-runbook"
//! qe_subsection: "integration-tests"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Integration and validation tests for the settings core."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Golden byte layouts that remote nodes depend on.
use std::time::Duration;

use bytes::BytesMut;
use qe_settings::{
    LoadBalancing, Mode, OverflowMode, SettingFloat, SettingLoadBalancing, SettingMilliseconds,
    SettingOverflowModeGroupBy, SettingSeconds, SettingTotalsMode, SettingUInt64, TotalsMode,
};
use strum::VariantArray;

fn encoded<F: FnOnce(&mut BytesMut)>(write: F) -> Vec<u8> {
    let mut buf = BytesMut::new();
    write(&mut buf);
    buf.to_vec()
}

#[test]
fn counter_is_a_bare_varint() {
    let bytes = encoded(|buf| SettingUInt64::new(300).write_to(buf).expect("encode"));
    assert_eq!(bytes, vec![0xAC, 0x02]);
}

#[test]
fn durations_are_whole_unit_varints() {
    let secs = encoded(|buf| {
        SettingSeconds::new(Duration::from_millis(129_999))
            .write_to(buf)
            .expect("encode")
    });
    assert_eq!(secs, vec![0x81, 0x01]);

    let millis = encoded(|buf| {
        SettingMilliseconds::new(Duration::from_secs(1))
            .write_to(buf)
            .expect("encode")
    });
    assert_eq!(millis, vec![0xE8, 0x07]);
}

#[test]
fn float_is_length_prefixed_decimal_text() {
    let bytes = encoded(|buf| SettingFloat::new(-1.5).write_to(buf).expect("encode"));
    assert_eq!(bytes, b"\x04-1.5".to_vec());
}

#[test]
fn modes_are_length_prefixed_tokens() {
    let balancing = encoded(|buf| {
        SettingLoadBalancing::new(LoadBalancing::NearestHostname)
            .write_to(buf)
            .expect("encode")
    });
    assert_eq!(balancing, b"\x10nearest_hostname".to_vec());

    for mode in TotalsMode::VARIANTS.iter().copied() {
        let token = mode.token().expect("token");
        let bytes = encoded(|buf| SettingTotalsMode::new(mode).write_to(buf).expect("encode"));
        assert_eq!(bytes[0] as usize, token.len());
        assert_eq!(&bytes[1..], token.as_bytes());
    }

    let overflow = encoded(|buf| {
        SettingOverflowModeGroupBy::new(OverflowMode::Any)
            .write_to(buf)
            .expect("encode")
    });
    assert_eq!(overflow, b"\x03any".to_vec());
}

#[test]
fn decoding_golden_bytes_marks_settings_changed() {
    let mut threads = SettingUInt64::default();
    threads
        .read_from(&mut &[0xACu8, 0x02][..])
        .expect("decode counter");
    assert_eq!(threads.get(), 300);
    assert!(threads.is_changed());

    let mut totals = SettingTotalsMode::new(TotalsMode::BeforeHaving);
    totals
        .read_from(&mut &b"\x16after_having_exclusive"[..])
        .expect("decode totals");
    assert_eq!(totals.get(), TotalsMode::AfterHavingExclusive);
    assert!(totals.is_changed());
}
