//! Pre-flight validation of device sets.

use crate::resolver::Drivers;
use crate::transient::build_for_validation;
use crate::CoreError;
use stratum_schema::{root_disk_device, Cluster, Devices, InstanceType, State};
use tracing::{debug, trace};

/// Copy of a device set that validation may work on freely.
pub fn clone_for_validation(devices: &Devices) -> Devices {
    devices.clone()
}

/// Validate every device in `devices` against a transient instance.
///
/// Stops at the first device the registry rejects. When `expanded` is set the
/// devices are the instance's full expanded set and must contain exactly one
/// root disk; non-expanded validation skips that check. The caller's device
/// set is never modified.
pub fn validate_devices(
    drivers: &Drivers,
    state: &State,
    cluster: &Cluster,
    instance_type: InstanceType,
    name: &str,
    devices: Option<&Devices>,
    expanded: bool,
) -> Result<(), CoreError> {
    let Some(devices) = devices.filter(|d| !d.is_empty()) else {
        trace!("no devices to validate for {name}");
        return Ok(());
    };

    let inst = build_for_validation(
        drivers,
        state,
        instance_type,
        name,
        clone_for_validation(devices),
        None,
    )?;

    debug!(
        "validating {} device(s) for {instance_type} {name} on member {} (expanded: {expanded})",
        devices.len(),
        cluster.member
    );

    for (device, config) in inst.local_devices().iter() {
        drivers
            .registry()
            .new_device(&*inst, state, device, config.clone(), None)
            .map_err(|source| CoreError::DeviceValidationFailed {
                device: device.to_owned(),
                source,
            })?;
    }

    if expanded {
        let (root, _) = root_disk_device(&inst.expanded_devices().clone_native())?;
        trace!("root disk for {name} is {root}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_device::DeviceError;
    use stratum_schema::{DeviceConfig, RootDiskError};

    fn dev(pairs: &[(&str, &str)]) -> DeviceConfig {
        pairs.iter().copied().collect()
    }

    fn state() -> State {
        State::default().with_pool("default").with_network("lxdbr0")
    }

    fn validate(devices: &Devices, expanded: bool) -> Result<(), CoreError> {
        validate_devices(
            &Drivers::builtin(),
            &state(),
            &Cluster::standalone(),
            InstanceType::Container,
            "c1",
            Some(devices),
            expanded,
        )
    }

    #[test]
    fn clone_is_equal_and_independent() {
        let original: Devices = [("gpu0", dev(&[("type", "gpu")]))].into_iter().collect();
        let mut copy = clone_for_validation(&original);
        assert_eq!(copy, original);
        copy.remove("gpu0");
        assert_eq!(original.len(), 1);
    }

    #[test]
    fn absent_and_empty_sets_are_valid() {
        for expanded in [true, false] {
            assert!(validate(&Devices::new(), expanded).is_ok());
            assert!(validate_devices(
                &Drivers::builtin(),
                &state(),
                &Cluster::standalone(),
                InstanceType::Vm,
                "v1",
                None,
                expanded,
            )
            .is_ok());
        }
    }

    #[test]
    fn full_expanded_set_passes() {
        let devices: Devices = [
            ("root", dev(&[("type", "disk"), ("path", "/"), ("pool", "default")])),
            ("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")])),
        ]
        .into_iter()
        .collect();
        assert!(validate(&devices, true).is_ok());
    }

    #[test]
    fn root_disk_only_required_when_expanded() {
        let devices: Devices = [("eth0", dev(&[("type", "nic"), ("network", "lxdbr0")]))]
            .into_iter()
            .collect();
        assert!(validate(&devices, false).is_ok());
        assert!(matches!(
            validate(&devices, true),
            Err(CoreError::RootDisk(RootDiskError::Missing))
        ));
    }

    #[test]
    fn failing_device_is_named() {
        let devices: Devices = [("eth0", dev(&[("type", "nic"), ("network", "nope")]))]
            .into_iter()
            .collect();
        let err = validate(&devices, false).unwrap_err();
        assert!(matches!(
            err,
            CoreError::DeviceValidationFailed {
                ref device,
                source: DeviceError::NetworkNotFound(_),
            } if device == "eth0"
        ));
        assert!(err.to_string().contains("eth0"));
    }

    #[test]
    fn device_errors_come_before_root_disk_errors() {
        let devices: Devices = [("bad", dev(&[("type", "bogus")]))].into_iter().collect();
        assert!(matches!(
            validate(&devices, true),
            Err(CoreError::DeviceValidationFailed { .. })
        ));
    }

    #[test]
    fn unknown_type_rejected_only_when_there_is_work() {
        let devices: Devices = [("gpu0", dev(&[("type", "gpu")]))].into_iter().collect();
        let result = validate_devices(
            &Drivers::builtin(),
            &state(),
            &Cluster::standalone(),
            InstanceType::Any,
            "x",
            Some(&devices),
            false,
        );
        assert!(matches!(result, Err(CoreError::InvalidInstanceType { .. })));
    }
}
