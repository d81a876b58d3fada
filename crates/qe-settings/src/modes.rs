//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::errors::SettingsError;
use crate::mode::{Mode, ModeKind, ModePolicy};
use crate::setting::Setting;

/// How a replica is picked among those with the fewest errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LoadBalancing {
    /// Any replica, chosen at random.
    Random = 0,
    /// The replica whose host name differs from the local host name in the
    /// fewest characters.
    NearestHostname = 1,
}

impl Mode for LoadBalancing {
    const LABEL: &'static str = "load balancing mode";
    const TOKENS: &'static [&'static str] = &["random", "nearest_hostname"];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// Which rows feed the TOTALS row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TotalsMode {
    /// Every row read, including rows cut by the group limit or by HAVING.
    BeforeHaving = 0,
    /// Every row except those failing HAVING.
    AfterHavingInclusive = 1,
    /// Only rows that passed both the group limit and HAVING.
    AfterHavingExclusive = 2,
    /// Pick inclusive or exclusive automatically.
    AfterHavingAuto = 3,
}

impl Mode for TotalsMode {
    const LABEL: &'static str = "totals mode";
    const TOKENS: &'static [&'static str] = &[
        "before_having",
        "after_having_inclusive",
        "after_having_exclusive",
        "after_having_auto",
    ];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// What to do once a limit is exceeded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OverflowMode {
    /// Abort the query with an error.
    #[default]
    Throw = 0,
    /// Stop and return what has been computed so far.
    Break = 1,
    /// GROUP BY only: stop adding keys but keep aggregating existing ones.
    Any = 2,
}

impl Mode for OverflowMode {
    const LABEL: &'static str = "overflow mode";
    const TOKENS: &'static [&'static str] = &["throw", "break", "any"];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// Gates [`OverflowMode::Any`] behind a compile-time flag.
#[derive(Debug, Clone, Copy)]
pub struct OverflowPolicy<const ALLOW_ANY: bool>;

impl<const ALLOW_ANY: bool> ModePolicy<OverflowMode> for OverflowPolicy<ALLOW_ANY> {
    fn permits(mode: OverflowMode) -> bool {
        ALLOW_ANY || mode != OverflowMode::Any
    }
}

pub type SettingLoadBalancing = Setting<ModeKind<LoadBalancing>>;
pub type SettingTotalsMode = Setting<ModeKind<TotalsMode>>;
pub type SettingOverflowMode<const ALLOW_ANY: bool> =
    Setting<ModeKind<OverflowMode, OverflowPolicy<ALLOW_ANY>>>;
/// Overflow mode for GROUP BY limits, where `any` is legal.
pub type SettingOverflowModeGroupBy = SettingOverflowMode<true>;

macro_rules! mode_text_impls {
    ($($mode:ty),+ $(,)?) => {$(
        impl fmt::Display for $mode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token().map_err(|_| fmt::Error)?)
            }
        }

        impl FromStr for $mode {
            type Err = SettingsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_token(s)
            }
        }
    )+};
}

mode_text_impls!(LoadBalancing, TotalsMode, OverflowMode);
