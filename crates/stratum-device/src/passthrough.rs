//! Host hardware handed through to the guest: GPUs and USB devices.

use crate::rules::{allowed_keys, check_bool, check_hex_id, invalid, is_pci_address, optional};
use crate::DeviceError;
use stratum_schema::DeviceConfig;

pub(crate) fn validate_gpu(config: &DeviceConfig) -> Result<(), DeviceError> {
    allowed_keys(config, &["id", "pci", "vendorid", "productid"])?;
    if let Some(pci) = optional(config, "pci") {
        if !is_pci_address(pci) {
            return Err(invalid("pci", format!("'{pci}' is not a PCI address")));
        }
    }
    check_hex_id(config, "vendorid")?;
    check_hex_id(config, "productid")?;
    Ok(())
}

pub(crate) fn validate_usb(config: &DeviceConfig) -> Result<(), DeviceError> {
    allowed_keys(config, &["vendorid", "productid", "required"])?;
    check_hex_id(config, "vendorid")?;
    check_hex_id(config, "productid")?;
    check_bool(config, "required")?;
    Ok(())
}
