//! TOML host configuration and instance definitions.

use crate::args::{validate_instance_name, InstanceArgs};
use crate::profile::Profile;
use crate::state::{OsInfo, State};
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default)]
    pub storage_pools: Vec<String>,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub os: OsInfo,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl HostConfig {
    pub fn into_state(self) -> Result<State, SchemaError> {
        let mut seen = BTreeSet::new();
        let mut state = State::new(self.os);
        for pool in &self.storage_pools {
            state = state.with_pool(pool);
        }
        for network in &self.networks {
            state = state.with_network(network);
        }
        for profile in self.profiles {
            if !seen.insert(profile.name.clone()) {
                return Err(SchemaError::DuplicateProfile(profile.name));
            }
            state = state.with_profile(profile);
        }
        Ok(state)
    }
}

pub fn parse_host_str(input: &str) -> Result<HostConfig, SchemaError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_host_file(path: impl AsRef<Path>) -> Result<HostConfig, SchemaError> {
    let content = fs::read_to_string(path)?;
    parse_host_str(&content)
}

pub fn parse_instance_str(input: &str) -> Result<InstanceArgs, SchemaError> {
    let args: InstanceArgs = toml::from_str(input)?;
    validate_instance_name(&args.name)?;
    Ok(args)
}

pub fn parse_instance_file(path: impl AsRef<Path>) -> Result<InstanceArgs, SchemaError> {
    let content = fs::read_to_string(path)?;
    parse_instance_str(&content)
}
