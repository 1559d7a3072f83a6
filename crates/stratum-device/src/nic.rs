use crate::registry::VolatileStore;
use crate::rules::{allowed_keys, check_uint, invalid, is_mac_address, optional, required};
use crate::DeviceError;
use std::net::{Ipv4Addr, Ipv6Addr};
use stratum_schema::{DeviceConfig, Instance, InstanceType, State};

const KEYS: &[&str] = &[
    "nictype",
    "network",
    "parent",
    "name",
    "hwaddr",
    "mtu",
    "vlan",
    "host_name",
    "ipv4.address",
    "ipv6.address",
];

const NIC_TYPES: &[&str] = &[
    "bridged", "macvlan", "p2p", "physical", "sriov", "ipvlan", "routed",
];

const CONTAINER_ONLY_NIC_TYPES: &[&str] = &["ipvlan", "routed"];

const NEEDS_PARENT: &[&str] = &["bridged", "macvlan", "physical", "sriov"];

pub(crate) fn validate(
    inst: &dyn Instance,
    state: &State,
    config: &DeviceConfig,
    volatile: Option<&dyn VolatileStore>,
) -> Result<(), DeviceError> {
    allowed_keys(config, KEYS)?;

    match (optional(config, "network"), optional(config, "nictype")) {
        (Some(_), Some(_)) => {
            return Err(invalid("network", "cannot be combined with nictype"));
        }
        (Some(network), None) => {
            if !state.has_network(network) {
                return Err(DeviceError::NetworkNotFound(network.to_owned()));
            }
            if config.contains_key("parent") {
                return Err(invalid("parent", "cannot be combined with network"));
            }
        }
        (None, Some(nictype)) => validate_nictype(inst, config, nictype)?,
        (None, None) => return Err(DeviceError::MissingKey("nictype".to_owned())),
    }

    if let Some(hwaddr) = optional(config, "hwaddr") {
        if !is_mac_address(hwaddr) {
            return Err(invalid("hwaddr", format!("'{hwaddr}' is not a MAC address")));
        }
    } else if let Some(store) = volatile {
        // A previously generated address must still be well formed.
        let values = store.get();
        if let Some(hwaddr) = values.get("hwaddr") {
            if !is_mac_address(hwaddr) {
                return Err(invalid(
                    "volatile.hwaddr",
                    format!("'{hwaddr}' is not a MAC address"),
                ));
            }
        }
    }

    check_uint(config, "mtu")?;
    if let Some(vlan) = check_uint(config, "vlan")? {
        if vlan > 4094 {
            return Err(invalid("vlan", format!("{vlan} is out of range 0-4094")));
        }
    }

    if let Some(addr) = optional(config, "ipv4.address") {
        addr.parse::<Ipv4Addr>()
            .map_err(|_| invalid("ipv4.address", format!("'{addr}' is not an IPv4 address")))?;
    }
    if let Some(addr) = optional(config, "ipv6.address") {
        addr.parse::<Ipv6Addr>()
            .map_err(|_| invalid("ipv6.address", format!("'{addr}' is not an IPv6 address")))?;
    }

    Ok(())
}

fn validate_nictype(
    inst: &dyn Instance,
    config: &DeviceConfig,
    nictype: &str,
) -> Result<(), DeviceError> {
    if !NIC_TYPES.contains(&nictype) {
        return Err(invalid("nictype", format!("unknown nic type '{nictype}'")));
    }
    if CONTAINER_ONLY_NIC_TYPES.contains(&nictype)
        && inst.instance_type() != InstanceType::Container
    {
        return Err(invalid(
            "nictype",
            format!("'{nictype}' is not supported on {} instances", inst.instance_type()),
        ));
    }
    if NEEDS_PARENT.contains(&nictype) {
        required(config, "parent")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dev, state, FixedVolatile, TestInstance};

    #[test]
    fn managed_network_nic() {
        let inst = TestInstance::container("c1");
        let config = dev(&[("type", "nic"), ("network", "lxdbr0"), ("name", "eth0")]);
        assert!(validate(&inst, &state(), &config, None).is_ok());
    }

    #[test]
    fn unknown_network_rejected() {
        let inst = TestInstance::container("c1");
        let config = dev(&[("type", "nic"), ("network", "br-missing")]);
        assert!(matches!(
            validate(&inst, &state(), &config, None),
            Err(DeviceError::NetworkNotFound(_))
        ));
    }

    #[test]
    fn network_and_nictype_are_exclusive() {
        let inst = TestInstance::container("c1");
        let config = dev(&[("type", "nic"), ("network", "lxdbr0"), ("nictype", "bridged")]);
        assert!(validate(&inst, &state(), &config, None).is_err());
    }

    #[test]
    fn neither_network_nor_nictype() {
        let inst = TestInstance::container("c1");
        let config = dev(&[("type", "nic")]);
        assert!(matches!(
            validate(&inst, &state(), &config, None),
            Err(DeviceError::MissingKey(ref k)) if k == "nictype"
        ));
    }

    #[test]
    fn bridged_needs_parent() {
        let inst = TestInstance::vm("v1");
        let without = dev(&[("type", "nic"), ("nictype", "bridged")]);
        assert!(validate(&inst, &state(), &without, None).is_err());
        let with = dev(&[("type", "nic"), ("nictype", "bridged"), ("parent", "br0")]);
        assert!(validate(&inst, &state(), &with, None).is_ok());
    }

    #[test]
    fn routed_is_container_only() {
        let config = dev(&[("type", "nic"), ("nictype", "routed"), ("ipv4.address", "10.0.0.5")]);
        assert!(validate(&TestInstance::container("c1"), &state(), &config, None).is_ok());
        assert!(validate(&TestInstance::vm("v1"), &state(), &config, None).is_err());
    }

    #[test]
    fn bad_hwaddr_and_vlan() {
        let inst = TestInstance::container("c1");
        let mac = dev(&[("type", "nic"), ("network", "lxdbr0"), ("hwaddr", "zz")]);
        assert!(validate(&inst, &state(), &mac, None).is_err());
        let vlan = dev(&[
            ("type", "nic"),
            ("nictype", "macvlan"),
            ("parent", "eth0"),
            ("vlan", "5000"),
        ]);
        assert!(validate(&inst, &state(), &vlan, None).is_err());
    }

    #[test]
    fn volatile_hwaddr_checked_when_not_configured() {
        let inst = TestInstance::container("c1");
        let config = dev(&[("type", "nic"), ("network", "lxdbr0")]);
        let good = FixedVolatile::with("hwaddr", "00:16:3e:00:00:01");
        assert!(validate(&inst, &state(), &config, Some(&good)).is_ok());
        let bad = FixedVolatile::with("hwaddr", "garbage");
        assert!(validate(&inst, &state(), &config, Some(&bad)).is_err());
    }

    #[test]
    fn bad_ip_address() {
        let inst = TestInstance::container("c1");
        let config = dev(&[("type", "nic"), ("nictype", "routed"), ("ipv4.address", "300.1.1.1")]);
        assert!(validate(&inst, &state(), &config, None).is_err());
    }
}
