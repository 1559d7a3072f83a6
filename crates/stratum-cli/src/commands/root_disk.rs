use super::{json_pretty, load_instance, load_state, manager, report, EXIT_SUCCESS};
use std::path::Path;
use stratum_core::CoreError;
use stratum_schema::root_disk_device;

/// Resolve the root disk of an instance once its profiles are applied.
pub fn run(host: Option<&Path>, instance: &Path, json: bool) -> Result<u8, String> {
    let state = load_state(host)?;
    let args = load_instance(instance)?;

    let inst = match manager(state).load(&args) {
        Ok(inst) => inst,
        Err(e) => return report(&e, json),
    };
    let (name, config) = match root_disk_device(&inst.expanded_devices().clone_native()) {
        Ok(found) => found,
        Err(e) => return report(&CoreError::from(e), json),
    };

    if json {
        let payload = serde_json::json!({
            "instance": inst.name(),
            "device": name,
            "config": config,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        let pool = config.get("pool").map_or("(none)", String::as_str);
        println!("{name} (pool: {pool})");
    }
    Ok(EXIT_SUCCESS)
}
