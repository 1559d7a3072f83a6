use super::{load_instance, load_state, manager, print_instance, report, EXIT_SUCCESS};
use std::path::Path;

pub fn run(host: Option<&Path>, instance: &Path, json: bool) -> Result<u8, String> {
    let state = load_state(host)?;
    let args = load_instance(instance)?;

    match manager(state).load(&args) {
        Ok(inst) => {
            print_instance(&*inst, json)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => report(&e, json),
    }
}
