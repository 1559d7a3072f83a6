use crate::devices::Devices;
use crate::types::{InstanceName, InstanceType, ProjectName, DEFAULT_PROJECT};
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to construct an instance handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceArgs {
    pub name: InstanceName,
    #[serde(rename = "type")]
    pub instance_type: InstanceType,
    #[serde(default = "default_project")]
    pub project: ProjectName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub devices: Devices,
}

fn default_project() -> ProjectName {
    ProjectName::new(DEFAULT_PROJECT)
}

impl InstanceArgs {
    pub fn new(name: impl Into<InstanceName>, instance_type: InstanceType) -> Self {
        Self {
            name: name.into(),
            instance_type,
            project: default_project(),
            description: String::new(),
            ephemeral: false,
            architecture: None,
            profiles: Vec::new(),
            config: BTreeMap::new(),
            devices: Devices::new(),
        }
    }

    #[must_use]
    pub fn with_devices(mut self, devices: Devices) -> Self {
        self.devices = devices;
        self
    }

    #[must_use]
    pub fn with_profiles(mut self, profiles: &[&str]) -> Self {
        self.profiles = profiles.iter().map(|p| (*p).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn with_config(mut self, key: &str, value: &str) -> Self {
        self.config.insert(key.to_owned(), value.to_owned());
        self
    }
}

/// Instance names double as hostnames inside the guest.
pub fn validate_instance_name(name: &str) -> Result<(), SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.len() > 63 {
        return Err(invalid("name must be at most 63 characters"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid("only ASCII letters, digits and '-' are allowed"));
    }
    if name.starts_with('-') || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("name must not start with a digit or '-'"));
    }
    if name.ends_with('-') {
        return Err(invalid("name must not end with '-'"));
    }
    Ok(())
}
