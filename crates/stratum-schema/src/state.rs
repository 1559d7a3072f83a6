//! Read-only host state shared by every dispatch and validation call.

use crate::profile::Profile;
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OsInfo {
    #[serde(default = "default_true")]
    pub container_supported: bool,
    #[serde(default = "default_true")]
    pub vm_supported: bool,
    #[serde(default)]
    pub architectures: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for OsInfo {
    fn default() -> Self {
        Self {
            container_supported: true,
            vm_supported: true,
            architectures: vec![std::env::consts::ARCH.to_owned()],
        }
    }
}

/// Host capabilities, storage pools, networks, and profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub os: OsInfo,
    storage_pools: BTreeSet<String>,
    networks: BTreeSet<String>,
    profiles: BTreeMap<String, Profile>,
}

impl State {
    pub fn new(os: OsInfo) -> Self {
        Self {
            os,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: &str) -> Self {
        self.storage_pools.insert(pool.to_owned());
        self
    }

    #[must_use]
    pub fn with_network(mut self, network: &str) -> Self {
        self.networks.insert(network.to_owned());
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.name.clone(), profile);
        self
    }

    pub fn has_pool(&self, pool: &str) -> bool {
        self.storage_pools.contains(pool)
    }

    pub fn has_network(&self, network: &str) -> bool {
        self.networks.contains(network)
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Look up profiles by name, keeping the requested order.
    pub fn resolve_profiles(&self, names: &[String]) -> Result<Vec<Profile>, SchemaError> {
        names
            .iter()
            .map(|name| {
                self.profiles
                    .get(name)
                    .cloned()
                    .ok_or_else(|| SchemaError::ProfileNotFound(name.clone()))
            })
            .collect()
    }

    pub fn storage_pools(&self) -> impl Iterator<Item = &str> {
        self.storage_pools.iter().map(String::as_str)
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.networks.iter().map(String::as_str)
    }
}

/// Member name used by a server that is not part of a cluster.
pub const STANDALONE_MEMBER: &str = "none";

/// Cluster membership as seen from the local server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub member: String,
    #[serde(default)]
    pub peers: Vec<String>,
}

impl Cluster {
    pub fn standalone() -> Self {
        Self {
            member: STANDALONE_MEMBER.to_owned(),
            peers: Vec::new(),
        }
    }

    pub fn is_clustered(&self) -> bool {
        self.member != STANDALONE_MEMBER
    }
}

impl Default for Cluster {
    fn default() -> Self {
        Self::standalone()
    }
}
