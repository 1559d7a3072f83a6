//! Fixtures shared by the validator unit tests.

use crate::registry::VolatileStore;
use crate::DeviceError;
use std::collections::BTreeMap;
use stratum_schema::{DeviceConfig, Devices, Instance, InstanceType, State};

pub(crate) fn dev(pairs: &[(&str, &str)]) -> DeviceConfig {
    pairs.iter().copied().collect()
}

pub(crate) fn state() -> State {
    State::default().with_pool("default").with_network("lxdbr0")
}

#[derive(Debug)]
pub(crate) struct TestInstance {
    name: String,
    instance_type: InstanceType,
    config: BTreeMap<String, String>,
    devices: Devices,
}

impl TestInstance {
    pub(crate) fn container(name: &str) -> Self {
        Self::new(name, InstanceType::Container)
    }

    pub(crate) fn vm(name: &str) -> Self {
        Self::new(name, InstanceType::Vm)
    }

    fn new(name: &str, instance_type: InstanceType) -> Self {
        Self {
            name: name.to_owned(),
            instance_type,
            config: BTreeMap::new(),
            devices: Devices::new(),
        }
    }
}

impl Instance for TestInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn project(&self) -> &str {
        "default"
    }

    fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    fn description(&self) -> &str {
        ""
    }

    fn is_ephemeral(&self) -> bool {
        false
    }

    fn is_transient(&self) -> bool {
        true
    }

    fn profiles(&self) -> &[String] {
        &[]
    }

    fn local_config(&self) -> &BTreeMap<String, String> {
        &self.config
    }

    fn expanded_config(&self) -> &BTreeMap<String, String> {
        &self.config
    }

    fn local_devices(&self) -> &Devices {
        &self.devices
    }

    fn expanded_devices(&self) -> &Devices {
        &self.devices
    }
}

pub(crate) struct FixedVolatile(BTreeMap<String, String>);

impl FixedVolatile {
    pub(crate) fn with(key: &str, value: &str) -> Self {
        Self(BTreeMap::from([(key.to_owned(), value.to_owned())]))
    }
}

impl VolatileStore for FixedVolatile {
    fn get(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }

    fn set(&self, _changes: BTreeMap<String, String>) -> Result<(), DeviceError> {
        Err(DeviceError::Volatile("read-only fixture".to_owned()))
    }
}
