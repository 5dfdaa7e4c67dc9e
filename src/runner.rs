use std::fmt::Display;

use log::error;

use crate::{Resource, ServiceState};

/// Runs the check and keeps its error, along with the state to report it with, instead of
/// letting it escape. Nothing a check returns can end the plugin without a nagios answer.
pub fn safe_run<E: Display>(
    f: impl FnOnce() -> Result<Resource, E>,
    error_state: ServiceState,
) -> RunnerResult<E> {
    match f() {
        Ok(resource) => RunnerResult::Ok(resource),
        Err(err) => {
            error!("check failed: {err}");
            RunnerResult::Err(error_state, err)
        }
    }
}

pub enum RunnerResult<E> {
    Ok(Resource),
    Err(ServiceState, E),
}

impl<E: Display> RunnerResult<E> {
    pub fn to_nagios_string(&self) -> String {
        match self {
            RunnerResult::Ok(resource) => resource.to_nagios_string(),
            RunnerResult::Err(state, err) => format!("{state}: {err}"),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerResult::Ok(resource) => resource.exit_code(),
            RunnerResult::Err(state, _) => state.exit_code(),
        }
    }

    pub fn print_and_exit(self) -> ! {
        println!("{}", self.to_nagios_string());
        std::process::exit(self.exit_code());
    }
}
