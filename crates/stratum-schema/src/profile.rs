use crate::devices::Devices;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named bundle of config and devices applied to instances that list it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub devices: Devices,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Merge profile config in order, then the instance's own keys on top.
pub fn expand_config(
    local: &BTreeMap<String, String>,
    profiles: &[Profile],
) -> BTreeMap<String, String> {
    let mut expanded = BTreeMap::new();
    for profile in profiles {
        for (key, value) in &profile.config {
            expanded.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in local {
        expanded.insert(key.clone(), value.clone());
    }
    expanded
}

/// Merge profile devices in order, then the instance's own devices on top.
///
/// Devices are replaced whole by name; options are never merged across layers.
pub fn expand_devices(local: &Devices, profiles: &[Profile]) -> Devices {
    let mut expanded = Devices::new();
    for profile in profiles {
        for (name, config) in profile.devices.iter() {
            expanded.insert(name, config.clone());
        }
    }
    for (name, config) in local.iter() {
        expanded.insert(name, config.clone());
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceConfig;

    fn dev(pairs: &[(&str, &str)]) -> DeviceConfig {
        pairs.iter().copied().collect()
    }

    #[test]
    fn later_profiles_and_local_win() {
        let mut base = Profile::new("default");
        base.config.insert("limits.cpu".to_owned(), "1".to_owned());
        base.config.insert("limits.memory".to_owned(), "1GiB".to_owned());
        let mut big = Profile::new("big");
        big.config.insert("limits.cpu".to_owned(), "8".to_owned());

        let mut local = BTreeMap::new();
        local.insert("limits.memory".to_owned(), "4GiB".to_owned());

        let expanded = expand_config(&local, &[base, big]);
        assert_eq!(expanded["limits.cpu"], "8");
        assert_eq!(expanded["limits.memory"], "4GiB");
    }

    #[test]
    fn local_device_replaces_profile_device_whole() {
        let mut profile = Profile::new("default");
        profile.devices.insert(
            "root",
            dev(&[("type", "disk"), ("path", "/"), ("pool", "default"), ("size", "10GiB")]),
        );
        profile
            .devices
            .insert("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")]));

        let local: Devices = [(
            "root",
            dev(&[("type", "disk"), ("path", "/"), ("pool", "fast")]),
        )]
        .into_iter()
        .collect();

        let expanded = expand_devices(&local, &[profile]);
        assert_eq!(expanded.len(), 2);
        let root = expanded.get("root").unwrap();
        assert_eq!(root.get("pool"), Some("fast"));
        assert!(!root.contains_key("size"));
    }

    #[test]
    fn no_profiles_is_identity() {
        let local: Devices = [("gpu0", dev(&[("type", "gpu")]))].into_iter().collect();
        assert_eq!(expand_devices(&local, &[]), local);
    }
}
