//! OS-container backend.

use crate::common::{impl_instance, InstanceCommon};
use crate::driver::{prepare_create, InstanceDriver, InstanceHandle};
use crate::RuntimeError;
use stratum_schema::{is_true, Devices, InstanceArgs, InstanceType, Profile, State};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInstance {
    common: InstanceCommon,
}

impl ContainerInstance {
    pub fn common(&self) -> &InstanceCommon {
        &self.common
    }

    /// Whether nested containers are allowed inside this one.
    pub fn nesting(&self) -> bool {
        self.common
            .expanded_config
            .get("security.nesting")
            .is_some_and(|v| is_true(v))
    }
}

impl_instance!(ContainerInstance);

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerDriver;

impl ContainerDriver {
    pub fn new() -> Self {
        Self
    }
}

impl InstanceDriver for ContainerDriver {
    fn name(&self) -> &'static str {
        "lxc"
    }

    fn instance_type(&self) -> InstanceType {
        InstanceType::Container
    }

    fn load(
        &self,
        _state: &State,
        args: &InstanceArgs,
        profiles: &[Profile],
    ) -> Result<InstanceHandle, RuntimeError> {
        debug!("loading container {} ({} profiles)", args.name, profiles.len());
        Ok(Box::new(ContainerInstance {
            common: InstanceCommon::expanded(args, InstanceType::Container, profiles),
        }))
    }

    fn create(&self, state: &State, args: &InstanceArgs) -> Result<InstanceHandle, RuntimeError> {
        if !state.os.container_supported {
            return Err(RuntimeError::BackendUnavailable(self.name().to_owned()));
        }
        let profiles = prepare_create(state, args, InstanceType::Container)?;
        debug!("creating container {} in project {}", args.name, args.project);
        Ok(Box::new(ContainerInstance {
            common: InstanceCommon::expanded(args, InstanceType::Container, &profiles),
        }))
    }

    fn instantiate(
        &self,
        _state: &State,
        args: InstanceArgs,
        expanded_devices: Option<Devices>,
    ) -> InstanceHandle {
        Box::new(ContainerInstance {
            common: InstanceCommon::transient(args, InstanceType::Container, expanded_devices),
        })
    }
}
