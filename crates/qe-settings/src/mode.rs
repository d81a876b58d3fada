//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Closed string mappings for enumerated mode settings.
//!
//! Every mode enum owns an ordinal-indexed token table. Text, fields and the
//! wire all carry the canonical token; the wire wraps it in the string
//! encoding. A [`ModePolicy`] can reject members that are recognised by the
//! table but not legal in a given configuration context.
use std::fmt;
use std::marker::PhantomData;

use bytes::{Buf, BufMut};
use qe_common::{read_string, write_string, Field};
use strum::VariantArray;

use crate::errors::{Result, SettingsError};
use crate::setting::SettingKind;

/// A closed enumeration with a canonical token per variant.
///
/// `TOKENS[i]` is the token of the variant whose ordinal is `i`, and
/// `VARIANTS[i]` (from [`VariantArray`]) is that variant.
pub trait Mode: Copy + Eq + fmt::Debug + VariantArray + 'static {
    /// Human-readable family name, e.g. `"totals mode"`.
    const LABEL: &'static str;

    const TOKENS: &'static [&'static str];

    fn ordinal(self) -> usize;

    /// Variant for a raw ordinal coming from outside the type system.
    fn from_ordinal(ordinal: u64) -> Result<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::VARIANTS.get(index).copied())
            .ok_or(SettingsError::OutOfDeclaredRange {
                label: Self::LABEL,
                ordinal,
                len: Self::VARIANTS.len(),
            })
    }

    /// Canonical token of this variant.
    fn token(self) -> Result<&'static str> {
        token_at::<Self>(self.ordinal() as u64)
    }

    /// Look a token up in the table; exact, case-sensitive match.
    fn from_token(token: &str) -> Result<Self> {
        match Self::TOKENS.iter().position(|candidate| *candidate == token) {
            Some(index) => Self::from_ordinal(index as u64),
            None => Err(SettingsError::UnknownMode {
                label: Self::LABEL,
                token: token.to_owned(),
                accepted: Self::TOKENS.to_vec(),
            }),
        }
    }
}

/// Table lookup by raw ordinal.
pub fn token_at<M: Mode>(ordinal: u64) -> Result<&'static str> {
    usize::try_from(ordinal)
        .ok()
        .and_then(|index| M::TOKENS.get(index).copied())
        .ok_or(SettingsError::OutOfDeclaredRange {
            label: M::LABEL,
            ordinal,
            len: M::TOKENS.len(),
        })
}

/// Context-specific legality rule layered over a [`Mode`] table.
pub trait ModePolicy<M: Mode> {
    fn permits(mode: M) -> bool;
}

/// Every member of the table is legal.
#[derive(Debug, Clone, Copy)]
pub struct Unrestricted;

impl<M: Mode> ModePolicy<M> for Unrestricted {
    fn permits(_mode: M) -> bool {
        true
    }
}

/// Setting kind for a mode enum `M` gated by policy `P`.
#[derive(Debug, Clone, Copy)]
pub struct ModeKind<M, P = Unrestricted>(PhantomData<(M, P)>);

impl<M: Mode, P: ModePolicy<M>> ModeKind<M, P> {
    /// Tokens this context accepts, in ordinal order.
    pub fn accepted_tokens() -> Vec<&'static str> {
        M::VARIANTS
            .iter()
            .copied()
            .filter(|mode| P::permits(*mode))
            .filter_map(|mode| mode.token().ok())
            .collect()
    }

    fn admit(mode: M, token: &str) -> Result<M> {
        if P::permits(mode) {
            return Ok(mode);
        }
        Err(SettingsError::IllegalModeForContext {
            label: M::LABEL,
            token: token.to_owned(),
            accepted: Self::accepted_tokens(),
        })
    }
}

impl<M: Mode, P: ModePolicy<M>> SettingKind for ModeKind<M, P> {
    type Value = M;

    const NAME: &'static str = M::LABEL;

    fn from_field(field: &Field) -> Result<M> {
        let token = field
            .as_str()
            .map_err(|err| SettingsError::type_mismatch(Self::NAME, err))?;
        Self::parse(token)
    }

    fn to_field(value: &M) -> Result<Field> {
        Ok(Field::from(value.token()?))
    }

    fn parse(text: &str) -> Result<M> {
        let mode = M::from_token(text)?;
        Self::admit(mode, text)
    }

    fn render(value: &M) -> Result<String> {
        Ok(value.token()?.to_owned())
    }

    fn decode<B: Buf + ?Sized>(buf: &mut B) -> Result<M> {
        let token = read_string(buf)?;
        Self::parse(&token)
    }

    fn encode<B: BufMut + ?Sized>(value: &M, buf: &mut B) -> Result<()> {
        Ok(write_string(value.token()?, buf)?)
    }
}
