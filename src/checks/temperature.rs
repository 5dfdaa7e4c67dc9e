use std::fmt;

use log::debug;

use super::rows;
use crate::snmp::SnmpValue;
use crate::{Metric, Resource, Result, ServiceState, TriggerIfValue};

pub const COLUMNS: [&str; 4] = [
    ".1.3.6.1.4.1.2544.1.11.7.10.1.1.6.1.1",      // entity name
    ".1.3.6.1.4.1.2544.1.11.7.10.1.1.7.1.1",      // entity type
    ".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.5.1.1",  // current temperature
    ".1.3.6.1.4.1.2544.1.11.11.1.2.2.1.1.1.1.1",  // upper temperature threshold
];

pub const SUMMARY: &str = "get temperature of every module";

pub const HELP: &str = "\
Walks name, type, current temperature and upper threshold of every module.
The module is CRITICAL once its temperature rises above the threshold the
device reports for it. Values are reported in degrees Celsius.
Perfdata: 'temp_<name>'=<temperature>;;<threshold>";

/// A reading in tenths of a unit, as the device reports temperatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tenths(pub i64);

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

pub fn evaluate(values: &[SnmpValue]) -> Result<Resource> {
    if values.is_empty() {
        return Ok(Resource::new()
            .with_state(ServiceState::Unknown)
            .with_description("Failed to retrieve temperature data"));
    }

    let mut resource = Resource::new();
    for [name, kind, temperature, max] in rows::<4>(values)? {
        let temperature = Tenths(temperature.as_integer()?);
        let max = Tenths(max.as_integer()?);

        let metric = Metric::new(format!("temp_{name}"), temperature).with_thresholds(
            None,
            Some(max),
            TriggerIfValue::Greater,
        );
        debug!("{name} ({kind}): {temperature} of {max} -> {:?}", metric.state());

        resource.push_description(format!("Temperature for {name} is {temperature}°C"));
        resource.push_result(metric);
    }

    Ok(resource)
}
