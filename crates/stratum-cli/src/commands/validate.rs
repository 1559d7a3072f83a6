use super::{json_pretty, load_instance, load_state, ok_mark, report, EXIT_SUCCESS};
use std::path::Path;
use stratum_core::{validate_devices, Drivers};
use stratum_schema::{expand_devices, Cluster};

pub fn run(host: Option<&Path>, instance: &Path, expanded: bool, json: bool) -> Result<u8, String> {
    let state = load_state(host)?;
    let args = load_instance(instance)?;

    let devices = if expanded {
        let profiles = state
            .resolve_profiles(&args.profiles)
            .map_err(|e| e.to_string())?;
        expand_devices(&args.devices, &profiles)
    } else {
        args.devices.clone()
    };

    if let Err(e) = validate_devices(
        &Drivers::builtin(),
        &state,
        &Cluster::standalone(),
        args.instance_type,
        &args.name,
        Some(&devices),
        expanded,
    ) {
        return report(&e, json);
    }

    if json {
        let payload = serde_json::json!({
            "name": args.name.as_str(),
            "type": args.instance_type.as_str(),
            "expanded": expanded,
            "devices": devices.len(),
            "valid": true,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{} {} {}: {} device(s) valid",
            ok_mark(),
            args.instance_type,
            args.name,
            devices.len()
        );
    }
    Ok(EXIT_SUCCESS)
}
