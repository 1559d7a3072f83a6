use crate::resolver::BackendResolver;
use crate::CoreError;
use std::sync::Arc;
use stratum_runtime::InstanceHandle;
use stratum_schema::{Cluster, DeviceChanges, Devices, Instance, InstanceArgs, State};
use tracing::debug;

/// Instance operations on top of an injected [`BackendResolver`].
pub struct InstanceManager {
    state: Arc<State>,
    cluster: Cluster,
    resolver: Arc<dyn BackendResolver>,
}

impl InstanceManager {
    pub fn new(state: Arc<State>, cluster: Cluster, resolver: Arc<dyn BackendResolver>) -> Self {
        Self {
            state,
            cluster,
            resolver,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// Create an instance after checking its own devices, then check the
    /// devices it ends up with once its profiles are applied.
    pub fn create(&self, args: &InstanceArgs) -> Result<InstanceHandle, CoreError> {
        self.resolver.validate_devices(
            &self.state,
            &self.cluster,
            args.instance_type,
            &args.name,
            Some(&args.devices),
            false,
        )?;

        let inst = self.resolver.create(&self.state, args)?;

        self.resolver.validate_devices(
            &self.state,
            &self.cluster,
            inst.instance_type(),
            inst.name(),
            Some(inst.expanded_devices()),
            true,
        )?;

        debug!("created {} {}", inst.instance_type(), inst.name());
        Ok(inst)
    }

    /// Rebuild the handle of an existing instance with its profiles applied.
    pub fn load(&self, args: &InstanceArgs) -> Result<InstanceHandle, CoreError> {
        let profiles = self.state.resolve_profiles(&args.profiles)?;
        self.resolver.load(&self.state, args, &profiles)
    }

    /// Check a replacement device list for `inst` and report what it changes.
    pub fn validate_update(
        &self,
        inst: &dyn Instance,
        devices: &Devices,
    ) -> Result<DeviceChanges, CoreError> {
        self.resolver.validate_devices(
            &self.state,
            &self.cluster,
            inst.instance_type(),
            inst.name(),
            Some(devices),
            false,
        )?;
        Ok(inst.local_devices().changes(devices))
    }
}
