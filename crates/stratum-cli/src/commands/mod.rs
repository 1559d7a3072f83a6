pub mod completions;
pub mod create;
pub mod load;
pub mod root_disk;
pub mod validate;

use console::Style;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use stratum_core::{CoreError, Drivers, InstanceManager};
use stratum_runtime::RuntimeError;
use stratum_schema::{
    parse_host_file, parse_instance_file, Cluster, Devices, Instance, InstanceArgs, SchemaError,
    State,
};
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_VALIDATION_ERROR: u8 = 4;

pub const DEFAULT_POOL: &str = "default";
pub const DEFAULT_NETWORK: &str = "lxdbr0";

pub fn json_pretty(value: &impl Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Host state from `--host`, or a host with both backends, one pool and one
/// managed network.
pub fn load_state(host: Option<&Path>) -> Result<State, String> {
    let Some(path) = host else {
        debug!("no --host given, using pool '{DEFAULT_POOL}' and network '{DEFAULT_NETWORK}'");
        return Ok(State::default()
            .with_pool(DEFAULT_POOL)
            .with_network(DEFAULT_NETWORK));
    };
    debug!("loading host configuration from {}", path.display());
    parse_host_file(path)
        .and_then(stratum_schema::HostConfig::into_state)
        .map_err(|e| format!("config error: {}: {e}", path.display()))
}

pub fn load_instance(path: &Path) -> Result<InstanceArgs, String> {
    parse_instance_file(path).map_err(|e| format!("config error: {}: {e}", path.display()))
}

pub fn manager(state: State) -> InstanceManager {
    InstanceManager::new(
        Arc::new(state),
        Cluster::standalone(),
        Arc::new(Drivers::builtin()),
    )
}

/// Errors caused by the instance definition rather than by the host or a
/// backend.
pub fn is_validation_error(err: &CoreError) -> bool {
    match err {
        CoreError::InvalidInstanceType { .. }
        | CoreError::DeviceValidationFailed { .. }
        | CoreError::RootDisk(_) => true,
        CoreError::Runtime(runtime) => matches!(
            runtime,
            RuntimeError::InvalidConfigKey(_)
                | RuntimeError::InvalidConfigValue { .. }
                | RuntimeError::UnsupportedArchitecture(_)
                | RuntimeError::Schema(SchemaError::InvalidName { .. })
        ),
        CoreError::Schema(_) => false,
    }
}

/// Print a validation failure and return its exit code; anything else is
/// passed back to `main`.
pub fn report(err: &CoreError, json: bool) -> Result<u8, String> {
    if !is_validation_error(err) {
        return Err(err.to_string());
    }
    if json {
        let payload = serde_json::json!({
            "valid": false,
            "error": err.to_string(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        eprintln!("{} {err}", Style::new().red().apply_to("✗"));
    }
    Ok(EXIT_VALIDATION_ERROR)
}

pub fn ok_mark() -> String {
    Style::new().green().apply_to("✓").to_string()
}

#[derive(Debug, Serialize)]
pub struct InstanceSummary<'a> {
    pub name: &'a str,
    pub project: &'a str,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub description: &'a str,
    pub ephemeral: bool,
    pub profiles: &'a [String],
    pub config: &'a BTreeMap<String, String>,
    pub devices: &'a Devices,
}

impl<'a> InstanceSummary<'a> {
    pub fn expanded(inst: &'a dyn Instance) -> Self {
        Self {
            name: inst.name(),
            project: inst.project(),
            instance_type: inst.instance_type().to_string(),
            description: inst.description(),
            ephemeral: inst.is_ephemeral(),
            profiles: inst.profiles(),
            config: inst.expanded_config(),
            devices: inst.expanded_devices(),
        }
    }
}

/// Print an instance's expanded view.
pub fn print_instance(inst: &dyn Instance, json: bool) -> Result<(), String> {
    let summary = InstanceSummary::expanded(inst);
    if json {
        println!("{}", json_pretty(&summary)?);
        return Ok(());
    }
    println!("name:        {}", summary.name);
    println!("project:     {}", summary.project);
    println!("type:        {}", summary.instance_type);
    if !summary.description.is_empty() {
        println!("description: {}", summary.description);
    }
    println!("ephemeral:   {}", summary.ephemeral);
    println!("profiles:    {}", summary.profiles.join(", "));
    for (key, value) in summary.config {
        println!("config:      {key}={value}");
    }
    for (name, config) in summary.devices {
        let kind = config.device_type().unwrap_or("?");
        println!("device:      {name} ({kind})");
    }
    Ok(())
}
