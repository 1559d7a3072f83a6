use crate::common::{impl_instance, InstanceCommon};
use crate::driver::{InstanceDriver, InstanceHandle};
use crate::RuntimeError;
use std::sync::{Mutex, PoisonError};
use stratum_schema::{Devices, InstanceArgs, InstanceType, Profile, State};

/// A call observed by [`MockDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Load { name: String, profiles: Vec<String> },
    Create { name: String },
    Instantiate { name: String, expanded: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockInstance {
    common: InstanceCommon,
}

impl_instance!(MockInstance);

/// Driver that records every call and builds plain handles.
pub struct MockDriver {
    instance_type: InstanceType,
    calls: Mutex<Vec<DriverCall>>,
    failure: Option<String>,
}

impl MockDriver {
    pub fn new(instance_type: InstanceType) -> Self {
        Self {
            instance_type,
            calls: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Driver whose `load` and `create` always fail with `message`.
    pub fn failing(instance_type: InstanceType, message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::new(instance_type)
        }
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A panic in another recording thread must not lose this call.
    fn record(&self, call: DriverCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn fail_if_configured(&self) -> Result<(), RuntimeError> {
        match &self.failure {
            Some(message) => Err(RuntimeError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl InstanceDriver for MockDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    fn load(
        &self,
        _state: &State,
        args: &InstanceArgs,
        profiles: &[Profile],
    ) -> Result<InstanceHandle, RuntimeError> {
        self.record(DriverCall::Load {
            name: args.name.to_string(),
            profiles: profiles.iter().map(|p| p.name.clone()).collect(),
        });
        self.fail_if_configured()?;
        Ok(Box::new(MockInstance {
            common: InstanceCommon::expanded(args, self.instance_type, profiles),
        }))
    }

    fn create(&self, _state: &State, args: &InstanceArgs) -> Result<InstanceHandle, RuntimeError> {
        self.record(DriverCall::Create {
            name: args.name.to_string(),
        });
        self.fail_if_configured()?;
        Ok(Box::new(MockInstance {
            common: InstanceCommon::expanded(args, self.instance_type, &[]),
        }))
    }

    fn instantiate(
        &self,
        _state: &State,
        args: InstanceArgs,
        expanded_devices: Option<Devices>,
    ) -> InstanceHandle {
        self.record(DriverCall::Instantiate {
            name: args.name.to_string(),
            expanded: expanded_devices.is_some(),
        });
        Box::new(MockInstance {
            common: InstanceCommon::transient(args, self.instance_type, expanded_devices),
        })
    }
}
