use log::debug;

use super::rows;
use crate::snmp::SnmpValue;
use crate::{Metric, Resource, Result, ServiceState, TriggerIfValue};

pub const COLUMNS: [&str; 2] = [
    ".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.6.1", // current
    ".1.3.6.1.4.1.2544.1.11.11.1.2.2.1.1.3.1", // upper current threshold
];

pub const SUMMARY: &str = "get current drawn by every power supply";

pub const HELP: &str = "\
Walks current and upper current threshold of every power supply, in milliamps.
A supply is CRITICAL once it draws more than the threshold the device reports.
Perfdata: 'mamps_<n>'=<current>;;<threshold>";

pub fn evaluate(values: &[SnmpValue]) -> Result<Resource> {
    if values.is_empty() {
        return Ok(Resource::new()
            .with_state(ServiceState::Unknown)
            .with_description("Failed to retrieve amperage data"));
    }

    let mut resource = Resource::new();
    for (i, [ampere, max]) in rows::<2>(values)?.into_iter().enumerate() {
        let ampere = ampere.as_integer()?;
        let max = max.as_integer()?;

        let metric = Metric::new(format!("mamps_{}", i + 1), ampere).with_thresholds(
            None,
            Some(max),
            TriggerIfValue::Greater,
        );
        debug!("supply {}: {ampere} of {max} mA -> {:?}", i + 1, metric.state());

        resource.push_description(format!("Current Ampere {ampere} mA"));
        resource.push_result(metric);
    }

    Ok(resource)
}
