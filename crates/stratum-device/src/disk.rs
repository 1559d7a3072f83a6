use crate::rules::{
    allowed_keys, check_abs_path, check_bool, check_uint, invalid, is_byte_size, key_only_for,
    optional, required,
};
use crate::DeviceError;
use stratum_schema::{DeviceConfig, Instance, InstanceType, State};

const KEYS: &[&str] = &[
    "path",
    "source",
    "pool",
    "size",
    "readonly",
    "required",
    "shift",
    "boot.priority",
];

pub(crate) fn validate(
    inst: &dyn Instance,
    state: &State,
    config: &DeviceConfig,
) -> Result<(), DeviceError> {
    allowed_keys(config, KEYS)?;

    let path = required(config, "path")?;
    check_abs_path(config, "path")?;
    check_bool(config, "readonly")?;
    check_bool(config, "required")?;
    check_bool(config, "shift")?;
    check_uint(config, "boot.priority")?;
    key_only_for(inst, config, "shift", InstanceType::Container)?;
    key_only_for(inst, config, "boot.priority", InstanceType::Vm)?;

    let pool = optional(config, "pool");
    if let Some(pool) = pool {
        if !state.has_pool(pool) {
            return Err(DeviceError::PoolNotFound(pool.to_owned()));
        }
    }

    if let Some(size) = optional(config, "size") {
        if pool.is_none() {
            return Err(invalid("size", "only valid on pool-backed disks"));
        }
        if !is_byte_size(size) {
            return Err(invalid("size", format!("'{size}' is not a byte size")));
        }
    }

    if path == "/" {
        if optional(config, "source").is_some() {
            return Err(invalid("source", "root disk must not set a source"));
        }
    } else {
        required(config, "source")?;
    }

    Ok(())
}
