//! Device registry for Stratum instances.
//!
//! Constructing a device through a `DeviceRegistry` is how its configuration
//! is validated: the `BuiltinRegistry` checks option names and values for
//! disks, NICs, unix character/block devices, GPUs and USB devices against
//! the instance they attach to and the host `State`.

mod disk;
mod nic;
mod passthrough;
pub mod registry;
mod rules;
mod unix;

#[cfg(test)]
mod testing;

pub use registry::{
    validate_device_name, BuiltinRegistry, ConfiguredDevice, Device, DeviceKind, DeviceRegistry,
    VolatileStore,
};

use stratum_schema::InstanceType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("invalid device name: '{0}'")]
    InvalidName(String),
    #[error("missing device type")]
    MissingType,
    #[error("unsupported device type: {0}")]
    UnsupportedType(String),
    #[error("device type '{device_type}' is not supported on {instance_type} instances")]
    UnsupportedInstanceType {
        device_type: String,
        instance_type: InstanceType,
    },
    #[error("invalid device option: {0}")]
    InvalidKey(String),
    #[error("device option '{key}' is not supported on {instance_type} instances")]
    KeyNotSupported {
        key: String,
        instance_type: InstanceType,
    },
    #[error("missing required device option: {0}")]
    MissingKey(String),
    #[error("invalid value for device option '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("storage pool not found: {0}")]
    PoolNotFound(String),
    #[error("network not found: {0}")]
    NetworkNotFound(String),
    #[error("volatile update failed: {0}")]
    Volatile(String),
}
