//! Device validation gateway behaviour with the built-in and custom registries.

use std::sync::{Arc, Mutex};
use stratum_core::{validate_devices, BackendResolver, CoreError, Drivers};
use stratum_device::{
    BuiltinRegistry, Device, DeviceError, DeviceKind, DeviceRegistry, VolatileStore,
};
use stratum_runtime::{ContainerDriver, VmDriver};
use stratum_schema::{Cluster, DeviceConfig, Devices, Instance, InstanceType, RootDiskError, State};

fn dev(pairs: &[(&str, &str)]) -> DeviceConfig {
    pairs.iter().copied().collect()
}

fn state() -> State {
    State::default().with_pool("default").with_network("lxdbr0")
}

/// Records the devices it sees, rejects one by name, and scribbles on every
/// config it receives.
struct RecordingRegistry {
    reject: Option<&'static str>,
    seen: Mutex<Vec<String>>,
    all_transient: Mutex<bool>,
}

impl RecordingRegistry {
    fn new(reject: Option<&'static str>) -> Self {
        Self {
            reject,
            seen: Mutex::new(Vec::new()),
            all_transient: Mutex::new(true),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[derive(Debug)]
struct RecordedDevice {
    name: String,
    config: DeviceConfig,
}

impl Device for RecordedDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::None
    }

    fn config(&self) -> &DeviceConfig {
        &self.config
    }
}

impl DeviceRegistry for RecordingRegistry {
    fn new_device(
        &self,
        inst: &dyn Instance,
        _state: &State,
        name: &str,
        mut config: DeviceConfig,
        volatile: Option<&dyn VolatileStore>,
    ) -> Result<Box<dyn Device>, DeviceError> {
        assert!(volatile.is_none());
        self.seen.lock().unwrap().push(name.to_owned());
        *self.all_transient.lock().unwrap() &= inst.is_transient();

        config.insert("volatile.touched", "true");
        config.remove("path");

        if self.reject == Some(name) {
            return Err(DeviceError::InvalidValue {
                key: "type".to_owned(),
                reason: "rejected by test registry".to_owned(),
            });
        }
        Ok(Box::new(RecordedDevice {
            name: name.to_owned(),
            config,
        }))
    }
}

fn recording_drivers(registry: Arc<RecordingRegistry>) -> Drivers {
    Drivers::new(
        Arc::new(ContainerDriver::new()),
        Arc::new(VmDriver::new()),
        registry,
    )
}

fn run(
    drivers: &Drivers,
    instance_type: InstanceType,
    devices: &Devices,
    expanded: bool,
) -> Result<(), CoreError> {
    validate_devices(
        drivers,
        &state(),
        &Cluster::standalone(),
        instance_type,
        "c1",
        Some(devices),
        expanded,
    )
}

#[test]
fn empty_device_set_is_valid_in_both_modes() {
    let drivers = Drivers::builtin();
    for expanded in [true, false] {
        assert!(run(&drivers, InstanceType::Container, &Devices::new(), expanded).is_ok());
        assert!(run(&drivers, InstanceType::Vm, &Devices::new(), expanded).is_ok());
    }
}

#[test]
fn single_root_disk_container_is_valid_expanded() {
    let devices: Devices = [(
        "root",
        dev(&[("type", "disk"), ("path", "/"), ("pool", "default")]),
    )]
    .into_iter()
    .collect();
    assert!(run(&Drivers::builtin(), InstanceType::Container, &devices, true).is_ok());
}

#[test]
fn bare_root_disk_is_valid_expanded() {
    let devices: Devices = [("root", dev(&[("type", "disk"), ("path", "/")]))]
        .into_iter()
        .collect();
    assert!(run(&Drivers::builtin(), InstanceType::Container, &devices, true).is_ok());
    assert!(run(&Drivers::builtin(), InstanceType::Vm, &devices, true).is_ok());
}

#[test]
fn root_disk_on_unknown_pool_is_rejected() {
    let devices: Devices = [("root", dev(&[("type", "disk"), ("path", "/"), ("pool", "nvme")]))]
        .into_iter()
        .collect();
    assert!(matches!(
        run(&Drivers::builtin(), InstanceType::Container, &devices, true),
        Err(CoreError::DeviceValidationFailed {
            source: DeviceError::PoolNotFound(_),
            ..
        })
    ));
}

#[test]
fn missing_root_disk_only_matters_when_expanded() {
    let devices: Devices = [
        ("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")])),
        ("gpu0", dev(&[("type", "gpu")])),
    ]
    .into_iter()
    .collect();
    let drivers = Drivers::builtin();
    assert!(run(&drivers, InstanceType::Vm, &devices, false).is_ok());
    assert!(matches!(
        run(&drivers, InstanceType::Vm, &devices, true),
        Err(CoreError::RootDisk(RootDiskError::Missing))
    ));
}

#[test]
fn two_root_disks_are_ambiguous_when_expanded() {
    let root = dev(&[("type", "disk"), ("path", "/"), ("pool", "default")]);
    let devices: Devices = [("root", root.clone()), ("root2", root)].into_iter().collect();
    let drivers = Drivers::builtin();
    assert!(run(&drivers, InstanceType::Container, &devices, false).is_ok());
    assert!(matches!(
        run(&drivers, InstanceType::Container, &devices, true),
        Err(CoreError::RootDisk(RootDiskError::Ambiguous { .. }))
    ));
}

#[test]
fn caller_devices_untouched_by_mutating_registry() {
    let registry = Arc::new(RecordingRegistry::new(None));
    let drivers = recording_drivers(registry.clone());
    let devices: Devices = [
        ("root", dev(&[("type", "disk"), ("path", "/"), ("pool", "default")])),
        ("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")])),
    ]
    .into_iter()
    .collect();
    let snapshot = devices.clone();

    run(&drivers, InstanceType::Container, &devices, true).unwrap();

    assert_eq!(devices, snapshot);
    assert_eq!(registry.seen().len(), 2);
}

#[test]
fn caller_devices_untouched_on_failure() {
    let registry = Arc::new(RecordingRegistry::new(Some("eth0")));
    let drivers = recording_drivers(registry);
    let devices: Devices = [("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")]))]
        .into_iter()
        .collect();
    let snapshot = devices.clone();

    assert!(run(&drivers, InstanceType::Container, &devices, false).is_err());
    assert_eq!(devices, snapshot);
}

#[test]
fn first_failing_device_stops_validation() {
    let registry = Arc::new(RecordingRegistry::new(Some("eth0")));
    let drivers = recording_drivers(registry.clone());
    let devices: Devices = [
        ("disk0", dev(&[("type", "disk"), ("path", "/"), ("pool", "default")])),
        ("eth0", dev(&[("type", "nic")])),
        ("eth1", dev(&[("type", "nic")])),
        ("gpu0", dev(&[("type", "gpu")])),
    ]
    .into_iter()
    .collect();

    let err = run(&drivers, InstanceType::Container, &devices, true).unwrap_err();

    match &err {
        CoreError::DeviceValidationFailed { device, .. } => assert_eq!(device, "eth0"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("'eth0'"));
    let seen = registry.seen();
    assert_eq!(seen.last().map(String::as_str), Some("eth0"));
    assert!(!seen.contains(&"eth1".to_owned()));
    assert!(!seen.contains(&"gpu0".to_owned()));
}

#[test]
fn registry_sees_a_transient_instance() {
    let registry = Arc::new(RecordingRegistry::new(None));
    let drivers = recording_drivers(registry.clone());
    let devices: Devices = [("gpu0", dev(&[("type", "gpu")]))].into_iter().collect();
    run(&drivers, InstanceType::Vm, &devices, false).unwrap();
    assert!(*registry.all_transient.lock().unwrap());
}

#[test]
fn backend_specific_device_rules_apply() {
    let devices: Devices = [("kvm", dev(&[("type", "unix-char"), ("source", "/dev/kvm")]))]
        .into_iter()
        .collect();
    let drivers = Drivers::builtin();
    assert!(run(&drivers, InstanceType::Container, &devices, false).is_ok());
    assert!(matches!(
        run(&drivers, InstanceType::Vm, &devices, false),
        Err(CoreError::DeviceValidationFailed {
            source: DeviceError::UnsupportedInstanceType { .. },
            ..
        })
    ));
}

#[test]
fn resolver_trait_matches_free_function() {
    let drivers = Drivers::builtin();
    let devices: Devices = [("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")]))]
        .into_iter()
        .collect();
    let via_trait = drivers.validate_devices(
        &state(),
        &Cluster::standalone(),
        InstanceType::Container,
        "c1",
        Some(&devices),
        true,
    );
    assert!(matches!(via_trait, Err(CoreError::RootDisk(RootDiskError::Missing))));
}

#[test]
fn builtin_registry_accepts_transient_instance() {
    let inst = Drivers::builtin()
        .instantiate(&state(), InstanceType::Container, "c1", Devices::new(), None)
        .unwrap();
    let device = BuiltinRegistry::new()
        .new_device(&*inst, &state(), "gpu0", dev(&[("type", "gpu")]), None)
        .unwrap();
    assert_eq!(device.kind(), DeviceKind::Gpu);
    assert_eq!(device.config().device_type(), Some("gpu"));
}
