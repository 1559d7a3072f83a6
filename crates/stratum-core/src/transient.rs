//! Throwaway instance handles that give device validators a realistic context.

use crate::resolver::Drivers;
use crate::CoreError;
use stratum_runtime::InstanceHandle;
use stratum_schema::{Devices, InstanceArgs, InstanceType, State};

/// Build a handle that is never persisted, registered, or started.
///
/// Without `expanded_devices` the handle reports `devices` as both its local
/// and expanded view.
pub fn build_for_validation(
    drivers: &Drivers,
    state: &State,
    instance_type: InstanceType,
    name: &str,
    devices: Devices,
    expanded_devices: Option<Devices>,
) -> Result<InstanceHandle, CoreError> {
    let driver = drivers
        .driver_for(instance_type)
        .ok_or_else(|| CoreError::InvalidInstanceType {
            name: name.to_owned(),
            instance_type,
        })?;

    let args = InstanceArgs::new(name, instance_type).with_devices(devices);
    Ok(driver.instantiate(state, args, expanded_devices))
}
