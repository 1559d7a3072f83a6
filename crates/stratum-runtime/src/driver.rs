use crate::config_keys::validate_config;
use crate::RuntimeError;
use stratum_schema::{
    validate_instance_name, Devices, Instance, InstanceArgs, InstanceType, Profile, State,
};

/// Instance handle owned by whoever asked for it.
pub type InstanceHandle = Box<dyn Instance>;

/// One execution backend's constructors.
pub trait InstanceDriver: Send + Sync {
    fn name(&self) -> &str;

    /// Backend this driver builds instances for.
    fn instance_type(&self) -> InstanceType;

    /// Rebuild the handle of an existing instance, expanding `profiles`.
    fn load(
        &self,
        state: &State,
        args: &InstanceArgs,
        profiles: &[Profile],
    ) -> Result<InstanceHandle, RuntimeError>;

    /// Build the handle of a new instance.
    fn create(&self, state: &State, args: &InstanceArgs) -> Result<InstanceHandle, RuntimeError>;

    /// Build a handle that is never registered or started. Cannot fail.
    fn instantiate(
        &self,
        state: &State,
        args: InstanceArgs,
        expanded_devices: Option<Devices>,
    ) -> InstanceHandle;
}

/// Checks every backend applies before creating an instance, returning the
/// profiles named by `args` in order.
pub(crate) fn prepare_create(
    state: &State,
    args: &InstanceArgs,
    instance_type: InstanceType,
) -> Result<Vec<Profile>, RuntimeError> {
    validate_instance_name(&args.name)?;

    if let Some(arch) = args.architecture.as_deref() {
        let known = &state.os.architectures;
        if !known.is_empty() && !known.iter().any(|a| a == arch) {
            return Err(RuntimeError::UnsupportedArchitecture(arch.to_owned()));
        }
    }

    validate_config(instance_type, &args.config)?;
    Ok(state.resolve_profiles(&args.profiles)?)
}
