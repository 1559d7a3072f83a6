use crate::devices::Devices;
use crate::types::InstanceType;
use std::collections::BTreeMap;
use std::fmt;

/// Backend-independent view of an instance.
///
/// Device validators receive this view as context, so it must be cheap to
/// construct and carry no runtime resources.
pub trait Instance: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn project(&self) -> &str;

    fn instance_type(&self) -> InstanceType;

    fn description(&self) -> &str;

    fn is_ephemeral(&self) -> bool;

    /// True for handles built only as validation context.
    fn is_transient(&self) -> bool;

    fn profiles(&self) -> &[String];

    fn local_config(&self) -> &BTreeMap<String, String>;

    /// Config after profile expansion.
    fn expanded_config(&self) -> &BTreeMap<String, String>;

    fn local_devices(&self) -> &Devices;

    /// Devices after profile expansion.
    fn expanded_devices(&self) -> &Devices;

    fn is_privileged(&self) -> bool {
        self.expanded_config()
            .get("security.privileged")
            .is_some_and(|v| is_true(v))
    }
}

/// Config boolean as accepted in instance and device options.
pub fn is_true(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Config boolean parse that rejects anything unrecognised.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
