//! Device configuration maps and root-disk resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Plain nested map form of a device set, as handed to the root-disk resolver.
pub type NativeDevices = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootDiskError {
    #[error("no root device could be found")]
    Missing,
    #[error("more than one root device found: '{first}' and '{second}'")]
    Ambiguous { first: String, second: String },
}

/// Options of a single device, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceConfig(BTreeMap<String, String>);

impl DeviceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the `type` option, if set and non-empty.
    pub fn device_type(&self) -> Option<&str> {
        self.get("type").filter(|t| !t.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for DeviceConfig {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Named devices attached to an instance or profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Devices(BTreeMap<String, DeviceConfig>);

/// Names that differ between two device sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
}

impl DeviceChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

impl Devices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DeviceConfig> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, config: DeviceConfig) -> Option<DeviceConfig> {
        self.0.insert(name.into(), config)
    }

    pub fn remove(&mut self, name: &str) -> Option<DeviceConfig> {
        self.0.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceConfig)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when a device with this name exists and has exactly this config.
    pub fn contains(&self, name: &str, config: &DeviceConfig) -> bool {
        self.0.get(name) == Some(config)
    }

    /// Plain nested map copy of the set.
    pub fn clone_native(&self) -> NativeDevices {
        self.0
            .iter()
            .map(|(name, config)| (name.clone(), config.as_map().clone()))
            .collect()
    }

    /// Names added, removed, or reconfigured going from `self` to `newer`.
    pub fn changes(&self, newer: &Devices) -> DeviceChanges {
        let mut changes = DeviceChanges::default();
        for (name, config) in &self.0 {
            match newer.0.get(name) {
                None => changes.removed.push(name.clone()),
                Some(other) if other != config => changes.updated.push(name.clone()),
                Some(_) => {}
            }
        }
        for name in newer.0.keys() {
            if !self.0.contains_key(name) {
                changes.added.push(name.clone());
            }
        }
        changes
    }
}

impl From<BTreeMap<String, DeviceConfig>> for Devices {
    fn from(map: BTreeMap<String, DeviceConfig>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, DeviceConfig)> for Devices {
    fn from_iter<I: IntoIterator<Item = (K, DeviceConfig)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'a> IntoIterator for &'a Devices {
    type Item = (&'a String, &'a DeviceConfig);
    type IntoIter = std::collections::btree_map::Iter<'a, String, DeviceConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A disk mounted at `/` without an explicit source is the root disk.
pub fn is_root_disk(config: &BTreeMap<String, String>) -> bool {
    config.get("type").map(String::as_str) == Some("disk")
        && config.get("path").map(String::as_str) == Some("/")
        && config.get("source").is_none_or(String::is_empty)
}

/// Find the single root disk in a device map.
pub fn root_disk_device(
    devices: &NativeDevices,
) -> Result<(String, BTreeMap<String, String>), RootDiskError> {
    let mut found: Option<(&String, &BTreeMap<String, String>)> = None;
    for (name, config) in devices {
        if !is_root_disk(config) {
            continue;
        }
        if let Some((first, _)) = found {
            return Err(RootDiskError::Ambiguous {
                first: first.clone(),
                second: name.clone(),
            });
        }
        found = Some((name, config));
    }

    found
        .map(|(name, config)| (name.clone(), config.clone()))
        .ok_or(RootDiskError::Missing)
}
