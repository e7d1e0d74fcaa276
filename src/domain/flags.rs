//! The fixed eight-slot flag model.
//!
//! Every episode carries up to [`FLAG_COUNT`] independent booleans per user.
//! Slots are named `flag_1` to `flag_8` on the wire and in the database; their
//! meaning is whatever label the user gave them in [`FlagLabels`].

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

pub const FLAG_COUNT: usize = 8;

static FLAG_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^flag_([1-8])$").expect("flag key pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid flag key '{0}': expected flag_1 through flag_8")]
pub struct FlagKeyError(pub String);

/// One of the eight flag slots, stored as its 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlagKey(u8);

impl FlagKey {
    /// Builds a key from its 1-based index.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index >= 1 && index as usize <= FLAG_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Zero-based position inside a [`FlagSet`] or [`FlagLabels`].
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.0 as usize - 1
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        const NAMES: [&str; FLAG_COUNT] = [
            "flag_1", "flag_2", "flag_3", "flag_4", "flag_5", "flag_6", "flag_7", "flag_8",
        ];
        NAMES[self.slot()]
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (1..=FLAG_COUNT as u8).map(Self)
    }
}

impl FromStr for FlagKey {
    type Err = FlagKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = FLAG_KEY_PATTERN
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .ok_or_else(|| FlagKeyError(s.to_string()))?;

        Ok(Self(index))
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FlagKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FlagKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Per-episode flag values. `None` means the flag was never written.
///
/// Serializes flattened as `flag_1` .. `flag_8`; unset slots are sent as
/// `null`, the same as a missing record on a left join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagSet([Option<bool>; FLAG_COUNT]);

impl FlagSet {
    #[must_use]
    pub const fn from_slots(slots: [Option<bool>; FLAG_COUNT]) -> Self {
        Self(slots)
    }

    #[must_use]
    pub const fn get(&self, key: FlagKey) -> Option<bool> {
        self.0[key.slot()]
    }

    /// Unset flags read as false.
    #[must_use]
    pub fn is_set(&self, key: FlagKey) -> bool {
        self.get(key).unwrap_or(false)
    }

    pub fn set(&mut self, key: FlagKey, value: Option<bool>) {
        self.0[key.slot()] = value;
    }

    #[must_use]
    pub const fn slots(&self) -> &[Option<bool>; FLAG_COUNT] {
        &self.0
    }

    /// Reads every unwritten slot as `false`, which is what a missing
    /// record means.
    #[must_use]
    pub fn unset_as_false(self) -> Self {
        Self(self.0.map(|v| Some(v.unwrap_or(false))))
    }
}

impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FLAG_COUNT))?;
        for key in FlagKey::all() {
            map.serialize_entry(key.as_str(), &self.get(key))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawFlagSet {
    #[serde(default)]
    flag_1: Option<bool>,
    #[serde(default)]
    flag_2: Option<bool>,
    #[serde(default)]
    flag_3: Option<bool>,
    #[serde(default)]
    flag_4: Option<bool>,
    #[serde(default)]
    flag_5: Option<bool>,
    #[serde(default)]
    flag_6: Option<bool>,
    #[serde(default)]
    flag_7: Option<bool>,
    #[serde(default)]
    flag_8: Option<bool>,
}

impl<'de> Deserialize<'de> for FlagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawFlagSet::deserialize(deserializer)?;
        Ok(Self([
            raw.flag_1, raw.flag_2, raw.flag_3, raw.flag_4, raw.flag_5, raw.flag_6, raw.flag_7,
            raw.flag_8,
        ]))
    }
}

/// User-defined display labels, one per flag slot. Empty means hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagLabels([String; FLAG_COUNT]);

impl FlagLabels {
    #[must_use]
    pub const fn new(labels: [String; FLAG_COUNT]) -> Self {
        Self(labels)
    }

    #[must_use]
    pub fn get(&self, key: FlagKey) -> &str {
        &self.0[key.slot()]
    }

    /// Label to show in messages, falling back to the raw key when unlabelled.
    #[must_use]
    pub fn display(&self, key: FlagKey) -> &str {
        let label = self.get(key);
        if label.is_empty() { key.as_str() } else { label }
    }

    #[must_use]
    pub fn is_visible(&self, key: FlagKey) -> bool {
        !self.get(key).is_empty()
    }

    /// Keys that carry a label, in slot order.
    pub fn visible(&self) -> impl Iterator<Item = (FlagKey, &str)> {
        FlagKey::all()
            .filter(|key| self.is_visible(*key))
            .map(|key| (key, self.get(key)))
    }

    #[must_use]
    pub fn into_inner(self) -> [String; FLAG_COUNT] {
        self.0
    }
}

impl Serialize for FlagLabels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FLAG_COUNT))?;
        for key in FlagKey::all() {
            map.serialize_entry(key.as_str(), self.get(key))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawFlagLabels {
    flag_1: String,
    flag_2: String,
    flag_3: String,
    flag_4: String,
    flag_5: String,
    flag_6: String,
    flag_7: String,
    flag_8: String,
}

impl<'de> Deserialize<'de> for FlagLabels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawFlagLabels::deserialize(deserializer)?;
        Ok(Self([
            raw.flag_1, raw.flag_2, raw.flag_3, raw.flag_4, raw.flag_5, raw.flag_6, raw.flag_7,
            raw.flag_8,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> FlagKey {
        FlagKey::new(n).unwrap()
    }

    #[test]
    fn parses_only_the_eight_slot_names() {
        assert_eq!("flag_1".parse::<FlagKey>().unwrap().index(), 1);
        assert_eq!("flag_8".parse::<FlagKey>().unwrap().index(), 8);
        assert!("flag_0".parse::<FlagKey>().is_err());
        assert!("flag_9".parse::<FlagKey>().is_err());
        assert!("flag_10".parse::<FlagKey>().is_err());
        assert!("Flag_1".parse::<FlagKey>().is_err());
        assert!(" flag_1".parse::<FlagKey>().is_err());
        assert!("flag_1; DROP TABLE users".parse::<FlagKey>().is_err());
        assert!("name".parse::<FlagKey>().is_err());
    }

    #[test]
    fn key_round_trips_through_display() {
        for k in FlagKey::all() {
            assert_eq!(k.to_string().parse::<FlagKey>().unwrap(), k);
        }
        assert_eq!(FlagKey::all().count(), FLAG_COUNT);
        assert!(FlagKey::new(0).is_none());
        assert!(FlagKey::new(9).is_none());
    }

    #[test]
    fn flag_set_sends_null_for_unset_slots() {
        let mut flags = FlagSet::default();
        flags.set(key(2), Some(true));
        flags.set(key(5), Some(false));

        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "flag_1": null, "flag_2": true, "flag_3": null, "flag_4": null,
                "flag_5": false, "flag_6": null, "flag_7": null, "flag_8": null,
            })
        );

        let back: FlagSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, flags);
        assert!(!back.is_set(key(1)));
        assert_eq!(back.get(key(1)), None);
    }

    #[test]
    fn unset_slots_read_as_false() {
        let mut flags = FlagSet::default();
        flags.set(key(3), Some(true));

        let resolved = flags.unset_as_false();
        assert_eq!(resolved.get(key(3)), Some(true));
        assert_eq!(resolved.get(key(1)), Some(false));
        assert!(resolved.slots().iter().all(Option::is_some));
    }

    #[test]
    fn flag_set_treats_null_as_unset() {
        let flags: FlagSet =
            serde_json::from_value(serde_json::json!({ "flag_1": null, "flag_3": true })).unwrap();
        assert_eq!(flags.get(key(1)), None);
        assert_eq!(flags.get(key(3)), Some(true));
    }

    #[test]
    fn labels_require_all_eight_fields() {
        let partial = serde_json::json!({ "flag_1": "Watched" });
        assert!(serde_json::from_value::<FlagLabels>(partial).is_err());

        let full = serde_json::json!({
            "flag_1": "Watched", "flag_2": "", "flag_3": "", "flag_4": "",
            "flag_5": "", "flag_6": "", "flag_7": "", "flag_8": "Downloaded",
        });
        let labels: FlagLabels = serde_json::from_value(full).unwrap();
        assert_eq!(labels.display(key(1)), "Watched");
        assert_eq!(labels.display(key(2)), "flag_2");

        let visible: Vec<_> = labels.visible().map(|(k, _)| k.index()).collect();
        assert_eq!(visible, vec![1, 8]);
    }
}
