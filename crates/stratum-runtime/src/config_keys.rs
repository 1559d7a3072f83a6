//! Instance config key validation applied on create.

use crate::RuntimeError;
use std::collections::BTreeMap;
use stratum_schema::{parse_bool, InstanceType};

/// Namespaces whose keys are free-form.
const FREE_FORM_PREFIXES: &[&str] = &["user.", "environment.", "volatile.", "image."];

pub fn validate_config(
    instance_type: InstanceType,
    config: &BTreeMap<String, String>,
) -> Result<(), RuntimeError> {
    for (key, value) in config {
        if FREE_FORM_PREFIXES.iter().any(|p| key.starts_with(p)) {
            continue;
        }
        match key.as_str() {
            "limits.cpu" => check_cpu_limit(key, value)?,
            "limits.memory" => check_memory_limit(key, value)?,
            "boot.autostart" => check_bool(key, value)?,
            "security.privileged" | "security.nesting" => {
                only_for(key, instance_type, InstanceType::Container)?;
                check_bool(key, value)?;
            }
            "security.secureboot" => {
                only_for(key, instance_type, InstanceType::Vm)?;
                check_bool(key, value)?;
            }
            _ => return Err(RuntimeError::InvalidConfigKey(key.clone())),
        }
    }
    Ok(())
}

fn invalid(key: &str, reason: String) -> RuntimeError {
    RuntimeError::InvalidConfigValue {
        key: key.to_owned(),
        reason,
    }
}

fn only_for(key: &str, actual: InstanceType, wanted: InstanceType) -> Result<(), RuntimeError> {
    if actual == wanted {
        Ok(())
    } else {
        Err(invalid(key, format!("not supported on {actual} instances")))
    }
}

fn check_bool(key: &str, value: &str) -> Result<(), RuntimeError> {
    parse_bool(value)
        .map(|_| ())
        .ok_or_else(|| invalid(key, format!("'{value}' is not a boolean")))
}

/// Either a CPU count or a cpuset such as `0-3,6`.
fn check_cpu_limit(key: &str, value: &str) -> Result<(), RuntimeError> {
    if let Ok(count) = value.parse::<u32>() {
        return if count == 0 {
            Err(invalid(key, "CPU count must be at least 1".to_owned()))
        } else {
            Ok(())
        };
    }

    let valid_set = !value.is_empty()
        && value.split(',').all(|part| match part.split_once('-') {
            Some((lo, hi)) => match (lo.parse::<u32>(), hi.parse::<u32>()) {
                (Ok(lo), Ok(hi)) => lo <= hi,
                _ => false,
            },
            None => part.parse::<u32>().is_ok(),
        });
    if valid_set {
        Ok(())
    } else {
        Err(invalid(key, format!("'{value}' is not a CPU count or set")))
    }
}

/// A byte size (`4GiB`) or a share of host memory (`50%`).
fn check_memory_limit(key: &str, value: &str) -> Result<(), RuntimeError> {
    if let Some(pct) = value.strip_suffix('%') {
        return match pct.parse::<u32>() {
            Ok(p) if (1..=100).contains(&p) => Ok(()),
            _ => Err(invalid(key, format!("'{value}' is not a valid percentage"))),
        };
    }

    const SUFFIXES: &[&str] = &["KiB", "MiB", "GiB", "TiB", "kB", "MB", "GB", "TB", "B"];
    let number = SUFFIXES
        .iter()
        .find_map(|s| value.strip_suffix(s))
        .unwrap_or(value);
    match number.parse::<u64>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(invalid(key, format!("'{value}' is not a memory size"))),
    }
}
