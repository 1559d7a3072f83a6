//! State shared by every instance implementation.

use std::collections::BTreeMap;
use stratum_schema::{
    expand_config, expand_devices, Devices, InstanceArgs, InstanceType, Profile,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCommon {
    pub(crate) name: String,
    pub(crate) project: String,
    pub(crate) instance_type: InstanceType,
    pub(crate) description: String,
    pub(crate) ephemeral: bool,
    pub(crate) architecture: Option<String>,
    pub(crate) profiles: Vec<String>,
    pub(crate) local_config: BTreeMap<String, String>,
    pub(crate) expanded_config: BTreeMap<String, String>,
    pub(crate) local_devices: Devices,
    /// `None` means the local devices double as the expanded view.
    pub(crate) expanded_devices: Option<Devices>,
    pub(crate) transient: bool,
}

impl InstanceCommon {
    /// Handle with config and devices expanded from `profiles`.
    pub(crate) fn expanded(
        args: &InstanceArgs,
        instance_type: InstanceType,
        profiles: &[Profile],
    ) -> Self {
        Self {
            name: args.name.to_string(),
            project: args.project.to_string(),
            instance_type,
            description: args.description.clone(),
            ephemeral: args.ephemeral,
            architecture: args.architecture.clone(),
            profiles: args.profiles.clone(),
            expanded_config: expand_config(&args.config, profiles),
            expanded_devices: Some(expand_devices(&args.devices, profiles)),
            local_config: args.config.clone(),
            local_devices: args.devices.clone(),
            transient: false,
        }
    }

    /// Handle used only as device validation context.
    pub(crate) fn transient(
        args: InstanceArgs,
        instance_type: InstanceType,
        expanded_devices: Option<Devices>,
    ) -> Self {
        Self {
            name: args.name.into_inner(),
            project: args.project.into_inner(),
            instance_type,
            description: args.description,
            ephemeral: args.ephemeral,
            architecture: args.architecture,
            profiles: args.profiles,
            expanded_config: args.config.clone(),
            local_config: args.config,
            local_devices: args.devices,
            expanded_devices,
            transient: true,
        }
    }

    pub fn architecture(&self) -> Option<&str> {
        self.architecture.as_deref()
    }
}

/// Implement `Instance` for a type holding an `InstanceCommon` in `common`.
macro_rules! impl_instance {
    ($ty:ty) => {
        impl stratum_schema::Instance for $ty {
            fn name(&self) -> &str {
                &self.common.name
            }

            fn project(&self) -> &str {
                &self.common.project
            }

            fn instance_type(&self) -> stratum_schema::InstanceType {
                self.common.instance_type
            }

            fn description(&self) -> &str {
                &self.common.description
            }

            fn is_ephemeral(&self) -> bool {
                self.common.ephemeral
            }

            fn is_transient(&self) -> bool {
                self.common.transient
            }

            fn profiles(&self) -> &[String] {
                &self.common.profiles
            }

            fn local_config(&self) -> &std::collections::BTreeMap<String, String> {
                &self.common.local_config
            }

            fn expanded_config(&self) -> &std::collections::BTreeMap<String, String> {
                &self.common.expanded_config
            }

            fn local_devices(&self) -> &stratum_schema::Devices {
                &self.common.local_devices
            }

            fn expanded_devices(&self) -> &stratum_schema::Devices {
                self.common
                    .expanded_devices
                    .as_ref()
                    .unwrap_or(&self.common.local_devices)
            }
        }
    };
}

pub(crate) use impl_instance;
