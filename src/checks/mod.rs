//! The four things an ADVA FSP can be asked about. Each check walks a fixed set of columns from
//! the ADVA enterprise MIB and turns the rows into a [Resource].

use log::debug;

use crate::snmp::{SnmpValue, Walker};
use crate::{Error, Resource, Result};

pub mod alarms;
pub mod amperage;
pub mod temperature;
pub mod voltage;

/// Options from the command line that influence how readings are judged and printed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub perfdata: bool,
    pub warning: Option<i64>,
    pub critical: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    Temperature,
    Voltage,
    Amperage,
    Alarms,
}

impl Check {
    pub const ALL: [Check; 4] = [
        Check::Temperature,
        Check::Voltage,
        Check::Amperage,
        Check::Alarms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::Temperature => "temperature",
            Check::Voltage => "voltage",
            Check::Amperage => "amperage",
            Check::Alarms => "alarms",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Check::Temperature => temperature::SUMMARY,
            Check::Voltage => voltage::SUMMARY,
            Check::Amperage => amperage::SUMMARY,
            Check::Alarms => alarms::SUMMARY,
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Check::Temperature => temperature::HELP,
            Check::Voltage => voltage::HELP,
            Check::Amperage => amperage::HELP,
            Check::Alarms => alarms::HELP,
        }
    }

    /// The table columns walked for this check, in the order the values are grouped.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Check::Temperature => &temperature::COLUMNS,
            Check::Voltage => &voltage::COLUMNS,
            Check::Amperage => &amperage::COLUMNS,
            Check::Alarms => &alarms::COLUMNS,
        }
    }

    /// Walks the columns of this check and judges the readings.
    pub fn run(self, walker: &mut dyn Walker, settings: &Settings) -> Result<Resource> {
        let values = walker.walk(self.columns())?;
        debug!("{} walk returned {} values", self.name(), values.len());

        let resource = match self {
            Check::Temperature => temperature::evaluate(&values)?,
            Check::Voltage => voltage::evaluate(&values, settings)?,
            Check::Amperage => amperage::evaluate(&values)?,
            Check::Alarms => alarms::evaluate(&values)?,
        };

        Ok(resource.with_perfdata(settings.perfdata))
    }
}

/// Splits the row-major walk result into rows of `N` values.
fn rows<const N: usize>(values: &[SnmpValue]) -> Result<Vec<&[SnmpValue; N]>> {
    let chunks = values.chunks_exact(N);
    if !chunks.remainder().is_empty() {
        return Err(Error::IncompleteRow {
            len: values.len(),
            width: N,
        });
    }

    Ok(chunks.filter_map(|row| row.try_into().ok()).collect())
}

#[cfg(test)]
pub(crate) mod fake {
    use crate::snmp::{SnmpValue, Walker};
    use crate::{Error, Result};

    /// Answers every walk with the same canned values.
    #[derive(Default)]
    pub struct FakeWalker {
        pub values: Vec<SnmpValue>,
        pub walked: Vec<String>,
    }

    impl FakeWalker {
        pub fn new(values: Vec<SnmpValue>) -> Self {
            FakeWalker {
                values,
                walked: Vec::new(),
            }
        }
    }

    impl Walker for FakeWalker {
        fn walk(&mut self, columns: &[&str]) -> Result<Vec<SnmpValue>> {
            self.walked.extend(columns.iter().map(|c| c.to_string()));
            Ok(self.values.clone())
        }
    }

    /// Fails like an agent that never answers.
    pub struct UnreachableWalker;

    impl Walker for UnreachableWalker {
        fn walk(&mut self, columns: &[&str]) -> Result<Vec<SnmpValue>> {
            Err(Error::Request {
                oid: columns.first().map(|c| c.to_string()).unwrap_or_default(),
                reason: "Timeout".to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeWalker, UnreachableWalker};
    use super::*;
    use crate::{safe_run, ServiceState};

    #[test]
    fn test_rows() {
        let values: Vec<SnmpValue> = (1..=6).map(SnmpValue::Integer).collect();

        let grouped = rows::<3>(&values).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[1][0], SnmpValue::Integer(4));

        assert!(rows::<3>(&[]).unwrap().is_empty());

        match rows::<4>(&values) {
            Err(Error::IncompleteRow { len, width }) => {
                assert_eq!(len, 6);
                assert_eq!(width, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_run_walks_check_columns() {
        for check in Check::ALL {
            let mut walker = FakeWalker::default();
            let _ = check.run(&mut walker, &Settings::default());
            assert_eq!(walker.walked, check.columns());
            assert!(check
                .columns()
                .iter()
                .all(|c| c.starts_with(".1.3.6.1.4.1.2544.")));
        }
    }

    #[test]
    fn test_empty_walks() {
        for check in [Check::Temperature, Check::Voltage, Check::Amperage] {
            let resource = check
                .run(&mut FakeWalker::default(), &Settings::default())
                .unwrap();
            assert_eq!(resource.state(), ServiceState::Unknown);
            assert!(resource.to_nagios_string().contains("Failed to retrieve"));
        }

        let resource = Check::Alarms
            .run(&mut FakeWalker::default(), &Settings::default())
            .unwrap();
        assert_eq!(resource.state(), ServiceState::Ok);
        assert_eq!(&resource.to_nagios_string(), "OK: No errors found");
    }

    #[test]
    fn test_unreachable_agent() {
        for check in Check::ALL {
            let result = safe_run(
                || check.run(&mut UnreachableWalker, &Settings::default()),
                ServiceState::Unknown,
            );
            assert_eq!(result.exit_code(), 3);
            assert!(result.to_nagios_string().starts_with("UNKNOWN: "));
        }
    }

    #[test]
    fn test_malformed_values() {
        let mut walker = FakeWalker::new(vec![SnmpValue::from("n/a")]);
        let result = safe_run(
            || Check::Voltage.run(&mut walker, &Settings::default()),
            ServiceState::Unknown,
        );
        assert_eq!(
            &result.to_nagios_string(),
            "UNKNOWN: value 'n/a' is not an integer"
        );

        let mut walker = FakeWalker::new(vec![
            SnmpValue::Integer(400),
            SnmpValue::Integer(900),
            SnmpValue::Integer(1),
        ]);
        let result = Check::Amperage.run(&mut walker, &Settings::default());
        assert!(matches!(result, Err(Error::IncompleteRow { len: 3, width: 2 })));
    }

    #[test]
    fn test_perfdata_flag() {
        let values = vec![SnmpValue::Integer(180000), SnmpValue::Integer(230000)];

        let resource = Check::Voltage
            .run(&mut FakeWalker::new(values.clone()), &Settings::default())
            .unwrap();
        assert_eq!(resource.to_nagios_string().lines().count(), 2);

        let settings = Settings {
            perfdata: true,
            ..Settings::default()
        };
        let output = Check::Voltage
            .run(&mut FakeWalker::new(values), &settings)
            .unwrap()
            .to_nagios_string();
        let perf = output.lines().last().unwrap();
        assert!(perf.starts_with('|'));
        assert_eq!(perf.split(' ').count(), 2);
    }
}
