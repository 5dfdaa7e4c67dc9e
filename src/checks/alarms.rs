use std::fmt;

use log::{debug, warn};

use super::rows;
use crate::snmp::SnmpValue;
use crate::{Resource, Result, ServiceState};

pub const COLUMNS: [&str; 3] = [
    ".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1", // severity
    ".1.3.6.1.4.1.2544.1.11.7.4.5.1.3.1", // service affecting
    ".1.3.6.1.4.1.2544.1.11.7.4.5.1.4.1", // time stamp
];

pub const SUMMARY: &str = "look for active equipment alarms";

pub const HELP: &str = "\
Walks severity, service impact and time stamp of every equipment alarm.
Any alarm of severity indeterminate, critical, major or minor (any code
below warning) is CRITICAL. Unknown codes above notReported are skipped.
A device without equipment alarms is OK.";

/// Severity of an equipment alarm, numbered as the device reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlarmSeverity {
    Unset = 0,
    Indeterminate = 1,
    Critical = 2,
    Major = 3,
    Minor = 4,
    Warning = 5,
    Cleared = 6,
    NotReported = 7,
}

impl AlarmSeverity {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => AlarmSeverity::Unset,
            1 => AlarmSeverity::Indeterminate,
            2 => AlarmSeverity::Critical,
            3 => AlarmSeverity::Major,
            4 => AlarmSeverity::Minor,
            5 => AlarmSeverity::Warning,
            6 => AlarmSeverity::Cleared,
            7 => AlarmSeverity::NotReported,
            _ => return None,
        })
    }

    /// Every code below warning needs attention, including codes the device does not name.
    pub fn is_active_code(code: i64) -> bool {
        code < AlarmSeverity::Warning as i64
    }
}

impl fmt::Display for AlarmSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlarmSeverity::Unset => "none",
            AlarmSeverity::Indeterminate => "indeterminate",
            AlarmSeverity::Critical => "critical",
            AlarmSeverity::Major => "major",
            AlarmSeverity::Minor => "minor",
            AlarmSeverity::Warning => "warning",
            AlarmSeverity::Cleared => "cleared",
            AlarmSeverity::NotReported => "notReported",
        };
        f.write_str(s)
    }
}

pub fn evaluate(values: &[SnmpValue]) -> Result<Resource> {
    if values.is_empty() {
        return Ok(Resource::new()
            .with_state(ServiceState::Ok)
            .with_description("No errors found"));
    }

    let mut resource = Resource::new();
    let mut active = 0;
    for [severity, affect, timestamp] in rows::<3>(values)? {
        let code = severity.as_integer()?;
        let name = match AlarmSeverity::from_code(code) {
            Some(severity) => severity.to_string(),
            None => format!("severity {code}"),
        };
        debug!("alarm {name} (affect {affect}, raised {timestamp:?})");

        if AlarmSeverity::is_active_code(code) {
            resource.push_description(format!("Alarm {name} found"));
            active += 1;
        } else if AlarmSeverity::from_code(code).is_none() {
            warn!("skipping alarm with unknown severity {code}");
        }
    }

    if active > 0 {
        resource.set_state(ServiceState::Critical);
    } else {
        resource.set_state(ServiceState::Ok);
        resource.push_description("No major errors found");
    }

    Ok(resource)
}
