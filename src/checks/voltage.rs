use log::debug;

use super::{rows, Settings};
use crate::snmp::SnmpValue;
use crate::{Metric, Resource, Result, ServiceState, TriggerIfValue};

pub const COLUMNS: [&str; 1] = [
    ".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1", // PSU input voltage
];

/// Millivolts.
pub const DEFAULT_WARNING: i64 = 200000;
pub const DEFAULT_CRITICAL: i64 = 150000;

pub const SUMMARY: &str = "get input voltage of every power supply";

pub const HELP: &str = "\
Walks the input voltage of every power supply, in millivolts.
A supply is WARNING below --warning (default 200000) and CRITICAL below
--critical (default 150000).
Perfdata: 'mvolts_<n>'=<voltage>;<warning>;<critical>";

pub fn evaluate(values: &[SnmpValue], settings: &Settings) -> Result<Resource> {
    if values.is_empty() {
        return Ok(Resource::new()
            .with_state(ServiceState::Unknown)
            .with_description("Failed to retrieve voltage data"));
    }

    let warning = settings.warning.unwrap_or(DEFAULT_WARNING);
    let critical = settings.critical.unwrap_or(DEFAULT_CRITICAL);

    let mut resource = Resource::new();
    for (i, [volt]) in rows::<1>(values)?.into_iter().enumerate() {
        let volt = volt.as_integer()?;

        let metric = Metric::new(format!("mvolts_{}", i + 1), volt).with_thresholds(
            Some(warning),
            Some(critical),
            TriggerIfValue::Less,
        );
        debug!("supply {}: {volt} mV -> {:?}", i + 1, metric.state());

        resource.push_description(format!("Input Voltage {volt} mV"));
        resource.push_result(metric);
    }

    Ok(resource)
}
