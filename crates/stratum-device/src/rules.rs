//! Option checks shared by the per-type validators.

use crate::DeviceError;
use stratum_schema::{parse_bool, DeviceConfig, Instance, InstanceType};

/// Reject any option not in `allowed`. `type` is always allowed.
pub(crate) fn allowed_keys(config: &DeviceConfig, allowed: &[&str]) -> Result<(), DeviceError> {
    for key in config.keys() {
        if key != "type" && !allowed.contains(&key) {
            return Err(DeviceError::InvalidKey(key.to_owned()));
        }
    }
    Ok(())
}

pub(crate) fn required<'a>(config: &'a DeviceConfig, key: &str) -> Result<&'a str, DeviceError> {
    match config.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DeviceError::MissingKey(key.to_owned())),
    }
}

/// Non-empty value of `key`, if present.
pub(crate) fn optional<'a>(config: &'a DeviceConfig, key: &str) -> Option<&'a str> {
    config.get(key).filter(|v| !v.is_empty())
}

pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> DeviceError {
    DeviceError::InvalidValue {
        key: key.to_owned(),
        reason: reason.into(),
    }
}

pub(crate) fn check_bool(config: &DeviceConfig, key: &str) -> Result<(), DeviceError> {
    if let Some(value) = config.get(key) {
        if parse_bool(value).is_none() {
            return Err(invalid(key, format!("'{value}' is not a boolean")));
        }
    }
    Ok(())
}

pub(crate) fn check_uint(config: &DeviceConfig, key: &str) -> Result<Option<u64>, DeviceError> {
    match optional(config, key) {
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(key, format!("'{value}' is not an unsigned integer"))),
        None => Ok(None),
    }
}

pub(crate) fn check_octal(config: &DeviceConfig, key: &str) -> Result<(), DeviceError> {
    if let Some(value) = optional(config, key) {
        if u32::from_str_radix(value, 8).is_err() {
            return Err(invalid(key, format!("'{value}' is not an octal mode")));
        }
    }
    Ok(())
}

pub(crate) fn check_abs_path(config: &DeviceConfig, key: &str) -> Result<(), DeviceError> {
    if let Some(value) = optional(config, key) {
        if !value.starts_with('/') {
            return Err(invalid(key, format!("'{value}' is not an absolute path")));
        }
    }
    Ok(())
}

/// Four hex digits, as used for USB and PCI vendor/product IDs.
pub(crate) fn check_hex_id(config: &DeviceConfig, key: &str) -> Result<(), DeviceError> {
    if let Some(value) = optional(config, key) {
        if value.len() != 4 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(key, format!("'{value}' is not a 4-digit hex ID")));
        }
    }
    Ok(())
}

pub(crate) fn is_mac_address(value: &str) -> bool {
    let parts: Vec<&str> = value.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

/// `DDDD:BB:DD.F` PCI address.
pub(crate) fn is_pci_address(value: &str) -> bool {
    let hex = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit());
    let mut parts = value.split(':');
    let (Some(domain), Some(bus), Some(rest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Some((slot, func)) = rest.split_once('.') else {
        return false;
    };
    hex(domain, 4) && hex(bus, 2) && hex(slot, 2) && func.len() == 1 && hex(func, 1)
}

/// Byte size such as `512`, `10GiB` or `1.5GB`.
pub(crate) fn is_byte_size(value: &str) -> bool {
    const SUFFIXES: &[&str] = &[
        "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "kB", "MB", "GB", "TB", "PB", "EB", "B",
    ];
    let number = SUFFIXES
        .iter()
        .find_map(|s| value.strip_suffix(s))
        .unwrap_or(value);
    !number.is_empty() && number.parse::<f64>().is_ok_and(|n| n >= 0.0)
}

/// Option only meaningful for one backend.
pub(crate) fn key_only_for(
    inst: &dyn Instance,
    config: &DeviceConfig,
    key: &str,
    backend: InstanceType,
) -> Result<(), DeviceError> {
    if config.contains_key(key) && inst.instance_type() != backend {
        return Err(DeviceError::KeyNotSupported {
            key: key.to_owned(),
            instance_type: inst.instance_type(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_addresses() {
        assert!(is_mac_address("00:16:3e:aa:bb:cc"));
        assert!(!is_mac_address("00:16:3e:aa:bb"));
        assert!(!is_mac_address("00:16:3e:aa:bb:zz"));
    }

    #[test]
    fn pci_addresses() {
        assert!(is_pci_address("0000:01:00.0"));
        assert!(!is_pci_address("01:00.0"));
        assert!(!is_pci_address("0000:01:00.10"));
    }

    #[test]
    fn byte_sizes() {
        assert!(is_byte_size("10GiB"));
        assert!(is_byte_size("512"));
        assert!(is_byte_size("1.5GB"));
        assert!(!is_byte_size("GiB"));
        assert!(!is_byte_size("ten"));
    }

    #[test]
    fn allowed_keys_rejects_unknown() {
        let config: DeviceConfig = [("type", "none"), ("bogus", "1")].into_iter().collect();
        assert!(matches!(
            allowed_keys(&config, &[]),
            Err(DeviceError::InvalidKey(ref k)) if k == "bogus"
        ));
    }

    #[test]
    fn required_treats_empty_as_missing() {
        let config: DeviceConfig = [("path", "")].into_iter().collect();
        assert!(matches!(required(&config, "path"), Err(DeviceError::MissingKey(_))));
    }
}
