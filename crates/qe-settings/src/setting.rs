//! ---
//! qe_section: "04-configuration-orchestration"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Change-tracked runtime settings and their codecs."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! The change-tracked [`Setting`] container.
//!
//! A setting remembers whether it was ever explicitly assigned so that only
//! explicitly set values are shipped to remote nodes; everything left at its
//! default lets the remote side keep its own default.
use std::fmt;
use std::marker::PhantomData;

use bytes::{Buf, BufMut};
use qe_common::Field;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::errors::Result;

/// Parsing and encoding strategies for one kind of setting value.
///
/// Implementors are zero-sized markers; all state lives in [`Setting`].
pub trait SettingKind {
    /// Stored value type.
    type Value: Clone + PartialEq + fmt::Debug;

    /// Short name used in logs and error messages.
    const NAME: &'static str;

    /// Extract a value from a dynamically typed field.
    fn from_field(field: &Field) -> Result<Self::Value>;

    /// Convert a value back into a field for serialization.
    fn to_field(value: &Self::Value) -> Result<Field>;

    /// Parse the textual form used in human-edited configuration.
    fn parse(text: &str) -> Result<Self::Value>;

    /// Render the canonical textual form.
    fn render(value: &Self::Value) -> Result<String>;

    /// Decode one value from the binary wire format.
    fn decode<B: Buf + ?Sized>(buf: &mut B) -> Result<Self::Value>;

    /// Encode a value into the binary wire format.
    fn encode<B: BufMut + ?Sized>(value: &Self::Value, buf: &mut B) -> Result<()>;
}

/// A typed value plus a flag recording whether it was ever assigned.
///
/// `changed` starts out `false` and becomes `true` on the first successful
/// `set*` call, whatever the new value is. It never goes back to `false`.
pub struct Setting<K: SettingKind> {
    value: K::Value,
    changed: bool,
    kind: PhantomData<fn() -> K>,
}

impl<K: SettingKind> Setting<K> {
    /// Create an untouched setting holding `initial`.
    pub fn new(initial: K::Value) -> Self {
        Self {
            value: initial,
            changed: false,
            kind: PhantomData,
        }
    }

    pub fn value(&self) -> &K::Value {
        &self.value
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Store `value` verbatim and mark the setting changed.
    pub fn set(&mut self, value: K::Value) {
        self.store(value, "native");
    }

    /// Assign from a dynamically typed field.
    pub fn set_field(&mut self, field: &Field) -> Result<()> {
        let value = K::from_field(field).inspect_err(|err| {
            debug!(kind = K::NAME, field = %field, error = %err, "rejected setting field");
        })?;
        self.store(value, "field");
        Ok(())
    }

    /// Assign from the textual configuration form.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let value = K::parse(text).inspect_err(|err| {
            debug!(kind = K::NAME, text, error = %err, "rejected setting text");
        })?;
        self.store(value, "text");
        Ok(())
    }

    /// Assign from the binary wire format, consuming exactly one value.
    pub fn read_from<B: Buf + ?Sized>(&mut self, buf: &mut B) -> Result<()> {
        let value = K::decode(buf).inspect_err(|err| {
            debug!(kind = K::NAME, error = %err, "rejected setting wire value");
        })?;
        self.store(value, "wire");
        Ok(())
    }

    /// Append the wire encoding of the current value.
    pub fn write_to<B: BufMut + ?Sized>(&self, buf: &mut B) -> Result<()> {
        K::encode(&self.value, buf)
    }

    /// Canonical textual form of the current value.
    pub fn to_text(&self) -> Result<String> {
        K::render(&self.value)
    }

    pub fn to_field(&self) -> Result<Field> {
        K::to_field(&self.value)
    }

    fn store(&mut self, value: K::Value, source: &'static str) {
        trace!(kind = K::NAME, source, value = ?value, "setting assigned");
        self.value = value;
        self.changed = true;
    }
}

impl<K: SettingKind> Setting<K>
where
    K::Value: Copy,
{
    /// Copy of the current value.
    pub fn get(&self) -> K::Value {
        self.value
    }
}

impl<K: SettingKind> Default for Setting<K>
where
    K::Value: Default,
{
    fn default() -> Self {
        Self::new(K::Value::default())
    }
}

impl<K: SettingKind> Clone for Setting<K> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            changed: self.changed,
            kind: PhantomData,
        }
    }
}

impl<K: SettingKind> Copy for Setting<K> where K::Value: Copy {}

impl<K: SettingKind> PartialEq for Setting<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.changed == other.changed
    }
}

impl<K: SettingKind> fmt::Debug for Setting<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("kind", &K::NAME)
            .field("value", &self.value)
            .field("changed", &self.changed)
            .finish()
    }
}

impl<K: SettingKind> fmt::Display for Setting<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_text().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<K: SettingKind> Serialize for Setting<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_field()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// A value present in a configuration document counts as explicitly set.
impl<'de, K: SettingKind> Deserialize<'de> for Setting<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let field = Field::deserialize(deserializer)?;
        let value = K::from_field(&field).map_err(<D::Error as serde::de::Error>::custom)?;
        trace!(kind = K::NAME, source = "config", value = ?value, "setting assigned");
        Ok(Self {
            value,
            changed: true,
            kind: PhantomData,
        })
    }
}
