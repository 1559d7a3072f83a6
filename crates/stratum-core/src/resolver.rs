use crate::{factory, transient, validate, CoreError};
use std::sync::Arc;
use stratum_device::{BuiltinRegistry, DeviceRegistry};
use stratum_runtime::{ContainerDriver, InstanceDriver, InstanceHandle, VmDriver};
use stratum_schema::{Cluster, Devices, InstanceArgs, InstanceType, Profile, State};

/// Backend dispatch and device validation, injected into whatever manages
/// instances so it never has to know which backends exist.
pub trait BackendResolver: Send + Sync {
    fn load(
        &self,
        state: &State,
        args: &InstanceArgs,
        profiles: &[Profile],
    ) -> Result<InstanceHandle, CoreError>;

    fn create(&self, state: &State, args: &InstanceArgs) -> Result<InstanceHandle, CoreError>;

    /// Transient handle for validation; see [`transient::build_for_validation`].
    fn instantiate(
        &self,
        state: &State,
        instance_type: InstanceType,
        name: &str,
        devices: Devices,
        expanded_devices: Option<Devices>,
    ) -> Result<InstanceHandle, CoreError>;

    /// See [`validate::validate_devices`].
    fn validate_devices(
        &self,
        state: &State,
        cluster: &Cluster,
        instance_type: InstanceType,
        name: &str,
        devices: Option<&Devices>,
        expanded: bool,
    ) -> Result<(), CoreError>;
}

/// The container and VM drivers plus the device registry they validate with.
#[derive(Clone)]
pub struct Drivers {
    container: Arc<dyn InstanceDriver>,
    vm: Arc<dyn InstanceDriver>,
    registry: Arc<dyn DeviceRegistry>,
}

impl Drivers {
    pub fn new(
        container: Arc<dyn InstanceDriver>,
        vm: Arc<dyn InstanceDriver>,
        registry: Arc<dyn DeviceRegistry>,
    ) -> Self {
        Self {
            container,
            vm,
            registry,
        }
    }

    /// LXC-style containers, QEMU-style VMs, and the built-in device types.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(ContainerDriver::new()),
            Arc::new(VmDriver::new()),
            Arc::new(BuiltinRegistry::new()),
        )
    }

    /// The single place an instance type is mapped to a backend.
    pub fn driver_for(&self, instance_type: InstanceType) -> Option<&dyn InstanceDriver> {
        match instance_type {
            InstanceType::Container => Some(self.container.as_ref()),
            InstanceType::Vm => Some(self.vm.as_ref()),
            InstanceType::Any => None,
        }
    }

    pub fn registry(&self) -> &dyn DeviceRegistry {
        self.registry.as_ref()
    }
}

impl Default for Drivers {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BackendResolver for Drivers {
    fn load(
        &self,
        state: &State,
        args: &InstanceArgs,
        profiles: &[Profile],
    ) -> Result<InstanceHandle, CoreError> {
        factory::load(self, state, args, profiles)
    }

    fn create(&self, state: &State, args: &InstanceArgs) -> Result<InstanceHandle, CoreError> {
        factory::create(self, state, args)
    }

    fn instantiate(
        &self,
        state: &State,
        instance_type: InstanceType,
        name: &str,
        devices: Devices,
        expanded_devices: Option<Devices>,
    ) -> Result<InstanceHandle, CoreError> {
        transient::build_for_validation(self, state, instance_type, name, devices, expanded_devices)
    }

    fn validate_devices(
        &self,
        state: &State,
        cluster: &Cluster,
        instance_type: InstanceType,
        name: &str,
        devices: Option<&Devices>,
        expanded: bool,
    ) -> Result<(), CoreError> {
        validate::validate_devices(self, state, cluster, instance_type, name, devices, expanded)
    }
}
