//! Data model shared by every Stratum crate.
//!
//! This crate defines the closed set of instance backends (`InstanceType`),
//! instance construction arguments (`InstanceArgs`), device sets and the
//! root-disk resolver, profiles and their expansion, the read-only host
//! `State`, the backend-independent `Instance` view, and TOML parsing for
//! host configuration and instance definitions.

pub mod args;
pub mod config;
pub mod devices;
pub mod instance;
pub mod profile;
pub mod state;
pub mod types;

pub use args::{validate_instance_name, InstanceArgs};
pub use config::{
    parse_host_file, parse_host_str, parse_instance_file, parse_instance_str, HostConfig,
};
pub use devices::{
    is_root_disk, root_disk_device, DeviceChanges, DeviceConfig, Devices, NativeDevices,
    RootDiskError,
};
pub use instance::{is_true, parse_bool, Instance};
pub use profile::{expand_config, expand_devices, Profile};
pub use state::{Cluster, OsInfo, State};
pub use types::{InstanceName, InstanceType, ProjectName, DEFAULT_PROJECT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("invalid instance type: {0}")]
    InvalidInstanceType(String),
    #[error("invalid instance name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
    #[error("duplicate profile: {0}")]
    DuplicateProfile(String),
}
