use crate::rules::allowed_keys;
use crate::{disk, nic, passthrough, unix, DeviceError};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use stratum_schema::{DeviceConfig, Instance, InstanceType, State};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Disk,
    Nic,
    UnixChar,
    UnixBlock,
    Gpu,
    Usb,
    None,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Disk => "disk",
            DeviceKind::Nic => "nic",
            DeviceKind::UnixChar => "unix-char",
            DeviceKind::UnixBlock => "unix-block",
            DeviceKind::Gpu => "gpu",
            DeviceKind::Usb => "usb",
            DeviceKind::None => "none",
        }
    }

    /// Backends this kind of device can attach to.
    pub fn supports(self, instance_type: InstanceType) -> bool {
        match self {
            DeviceKind::UnixChar | DeviceKind::UnixBlock => {
                instance_type == InstanceType::Container
            }
            _ => matches!(instance_type, InstanceType::Container | InstanceType::Vm),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disk" => Ok(DeviceKind::Disk),
            "nic" => Ok(DeviceKind::Nic),
            "unix-char" => Ok(DeviceKind::UnixChar),
            "unix-block" => Ok(DeviceKind::UnixBlock),
            "gpu" => Ok(DeviceKind::Gpu),
            "usb" => Ok(DeviceKind::Usb),
            "none" => Ok(DeviceKind::None),
            other => Err(DeviceError::UnsupportedType(other.to_owned())),
        }
    }
}

/// A device whose configuration passed validation for one instance.
pub trait Device: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> DeviceKind;

    fn config(&self) -> &DeviceConfig;
}

/// Per-device `volatile.*` keys, stored by the caller between runs.
pub trait VolatileStore {
    fn get(&self) -> BTreeMap<String, String>;

    fn set(&self, changes: BTreeMap<String, String>) -> Result<(), DeviceError>;
}

/// Builds devices for an instance; building a device is its validation.
pub trait DeviceRegistry: Send + Sync {
    fn new_device(
        &self,
        inst: &dyn Instance,
        state: &State,
        name: &str,
        config: DeviceConfig,
        volatile: Option<&dyn VolatileStore>,
    ) -> Result<Box<dyn Device>, DeviceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredDevice {
    name: String,
    kind: DeviceKind,
    config: DeviceConfig,
}

impl Device for ConfiguredDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn config(&self) -> &DeviceConfig {
        &self.config
    }
}

pub fn validate_device_name(name: &str) -> Result<(), DeviceError> {
    if name.is_empty() || name.contains('/') {
        return Err(DeviceError::InvalidName(name.to_owned()));
    }
    Ok(())
}

/// Registry for the device types Stratum knows about.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRegistry;

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceRegistry for BuiltinRegistry {
    fn new_device(
        &self,
        inst: &dyn Instance,
        state: &State,
        name: &str,
        config: DeviceConfig,
        volatile: Option<&dyn VolatileStore>,
    ) -> Result<Box<dyn Device>, DeviceError> {
        validate_device_name(name)?;

        let kind: DeviceKind = config
            .device_type()
            .ok_or(DeviceError::MissingType)?
            .parse()?;
        if !kind.supports(inst.instance_type()) {
            return Err(DeviceError::UnsupportedInstanceType {
                device_type: kind.to_string(),
                instance_type: inst.instance_type(),
            });
        }

        trace!("validating {kind} device '{name}' for {}", inst.name());
        match kind {
            DeviceKind::Disk => disk::validate(inst, state, &config)?,
            DeviceKind::Nic => nic::validate(inst, state, &config, volatile)?,
            DeviceKind::UnixChar | DeviceKind::UnixBlock => unix::validate(&config)?,
            DeviceKind::Gpu => passthrough::validate_gpu(&config)?,
            DeviceKind::Usb => passthrough::validate_usb(&config)?,
            DeviceKind::None => allowed_keys(&config, &[])?,
        }

        Ok(Box::new(ConfiguredDevice {
            name: name.to_owned(),
            kind,
            config,
        }))
    }
}
