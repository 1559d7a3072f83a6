use crate::rules::{allowed_keys, check_abs_path, check_bool, check_octal, check_uint, optional};
use crate::DeviceError;
use stratum_schema::DeviceConfig;

const KEYS: &[&str] = &[
    "source", "path", "major", "minor", "uid", "gid", "mode", "required",
];

/// `unix-char` and `unix-block` share one option set.
pub(crate) fn validate(config: &DeviceConfig) -> Result<(), DeviceError> {
    allowed_keys(config, KEYS)?;

    if optional(config, "source").is_none() && optional(config, "path").is_none() {
        return Err(DeviceError::MissingKey("source".to_owned()));
    }
    check_abs_path(config, "source")?;
    check_abs_path(config, "path")?;
    check_uint(config, "major")?;
    check_uint(config, "minor")?;
    check_uint(config, "uid")?;
    check_uint(config, "gid")?;
    check_octal(config, "mode")?;
    check_bool(config, "required")?;
    Ok(())
}
