//! Full virtual-machine backend.

use crate::common::{impl_instance, InstanceCommon};
use crate::driver::{prepare_create, InstanceDriver, InstanceHandle};
use crate::RuntimeError;
use stratum_schema::{parse_bool, Devices, InstanceArgs, InstanceType, Profile, State};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmInstance {
    common: InstanceCommon,
}

impl VmInstance {
    pub fn common(&self) -> &InstanceCommon {
        &self.common
    }

    /// UEFI secure boot, on unless explicitly disabled.
    pub fn secure_boot(&self) -> bool {
        self.common
            .expanded_config
            .get("security.secureboot")
            .and_then(|v| parse_bool(v))
            .unwrap_or(true)
    }
}

impl_instance!(VmInstance);

#[derive(Debug, Clone, Copy, Default)]
pub struct VmDriver;

impl VmDriver {
    pub fn new() -> Self {
        Self
    }
}

impl InstanceDriver for VmDriver {
    fn name(&self) -> &'static str {
        "qemu"
    }

    fn instance_type(&self) -> InstanceType {
        InstanceType::Vm
    }

    fn load(
        &self,
        _state: &State,
        args: &InstanceArgs,
        profiles: &[Profile],
    ) -> Result<InstanceHandle, RuntimeError> {
        debug!("loading virtual machine {} ({} profiles)", args.name, profiles.len());
        Ok(Box::new(VmInstance {
            common: InstanceCommon::expanded(args, InstanceType::Vm, profiles),
        }))
    }

    fn create(&self, state: &State, args: &InstanceArgs) -> Result<InstanceHandle, RuntimeError> {
        if !state.os.vm_supported {
            return Err(RuntimeError::BackendUnavailable(self.name().to_owned()));
        }
        let profiles = prepare_create(state, args, InstanceType::Vm)?;
        debug!("creating virtual machine {} in project {}", args.name, args.project);
        Ok(Box::new(VmInstance {
            common: InstanceCommon::expanded(args, InstanceType::Vm, &profiles),
        }))
    }

    fn instantiate(
        &self,
        _state: &State,
        args: InstanceArgs,
        expanded_devices: Option<Devices>,
    ) -> InstanceHandle {
        Box::new(VmInstance {
            common: InstanceCommon::transient(args, InstanceType::Vm, expanded_devices),
        })
    }
}
