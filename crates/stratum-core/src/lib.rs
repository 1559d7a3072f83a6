//! Backend dispatch and device validation for Stratum.
//!
//! This crate is the seam between instance management and the execution
//! backends. `Drivers` maps an `InstanceType` to the container or VM driver
//! (`factory::load`, `factory::create`), builds transient instances that give
//! device validators a realistic context (`transient::build_for_validation`),
//! and validates device sets on an isolated clone
//! (`validate::validate_devices`). Callers depend on the `BackendResolver`
//! trait, which `InstanceManager` receives at construction.

pub mod factory;
pub mod manager;
pub mod resolver;
pub mod transient;
pub mod validate;

pub use manager::InstanceManager;
pub use resolver::{BackendResolver, Drivers};
pub use transient::build_for_validation;
pub use validate::{clone_for_validation, validate_devices};

use stratum_schema::InstanceType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid instance type '{instance_type}' for instance {name}")]
    InvalidInstanceType {
        name: String,
        instance_type: InstanceType,
    },
    #[error("device validation failed for '{device}': {source}")]
    DeviceValidationFailed {
        device: String,
        #[source]
        source: stratum_device::DeviceError,
    },
    #[error("failed detecting root disk device: {0}")]
    RootDisk(#[from] stratum_schema::RootDiskError),
    #[error(transparent)]
    Runtime(#[from] stratum_runtime::RuntimeError),
    #[error("{0}")]
    Schema(#[from] stratum_schema::SchemaError),
}
