//! Instance drivers for Stratum.
//!
//! This crate implements one `InstanceDriver` per backend: `ContainerDriver`
//! for OS containers and `VmDriver` for full virtual machines. Each driver can
//! load an existing instance (expanding its profiles), create a new one
//! (checking host support, name, architecture and config keys), or
//! instantiate a transient handle used only as validation context. The
//! `MockDriver` records calls for tests.

mod common;
pub mod config_keys;
pub mod container;
pub mod driver;
pub mod mock;
pub mod vm;

pub use common::InstanceCommon;
pub use config_keys::validate_config;
pub use container::{ContainerDriver, ContainerInstance};
pub use driver::{InstanceDriver, InstanceHandle};
pub use mock::{DriverCall, MockDriver, MockInstance};
pub use vm::{VmDriver, VmInstance};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Schema(#[from] stratum_schema::SchemaError),
    #[error("backend '{0}' is not available on this system")]
    BackendUnavailable(String),
    #[error("architecture not supported by this host: {0}")]
    UnsupportedArchitecture(String),
    #[error("invalid config key: {0}")]
    InvalidConfigKey(String),
    #[error("invalid value for config key '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },
    #[error("backend failure: {0}")]
    Backend(String),
}
