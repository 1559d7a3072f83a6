//! Load and create dispatch.
//!
//! Backend results are returned as-is: the only error added here is
//! `InvalidInstanceType` for a tag with no backend.

use crate::resolver::Drivers;
use crate::CoreError;
use stratum_runtime::{InstanceDriver, InstanceHandle};
use stratum_schema::{InstanceArgs, Profile, State};
use tracing::debug;

fn driver<'a>(
    drivers: &'a Drivers,
    args: &InstanceArgs,
) -> Result<&'a dyn InstanceDriver, CoreError> {
    drivers
        .driver_for(args.instance_type)
        .ok_or_else(|| CoreError::InvalidInstanceType {
            name: args.name.to_string(),
            instance_type: args.instance_type,
        })
}

pub fn load(
    drivers: &Drivers,
    state: &State,
    args: &InstanceArgs,
    profiles: &[Profile],
) -> Result<InstanceHandle, CoreError> {
    let driver = driver(drivers, args)?;
    debug!("loading {} through the {} driver", args.name, driver.name());
    Ok(driver.load(state, args, profiles)?)
}

pub fn create(
    drivers: &Drivers,
    state: &State,
    args: &InstanceArgs,
) -> Result<InstanceHandle, CoreError> {
    let driver = driver(drivers, args)?;
    debug!("creating {} through the {} driver", args.name, driver.name());
    Ok(driver.create(state, args)?)
}
