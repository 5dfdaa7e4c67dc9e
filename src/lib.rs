//! The check_adva crate polls an ADVA FSP device over SNMP v2c and reports its health
//! (temperature, voltage, amperage and alarms) the way nagios and icinga expect it.
//!
//! ```rust
//! # use check_adva::{Metric, Resource, ServiceState, TriggerIfValue};
//! let resource = Resource::new()
//!     .with_description("Input Voltage 180000 mV")
//!     .with_result(
//!         Metric::new("mvolts_1", 180000)
//!             .with_thresholds(Some(200000), Some(150000), TriggerIfValue::Less),
//!     )
//!     .with_perfdata(true);
//!
//! assert_eq!(resource.state(), ServiceState::Warning);
//! assert_eq!(
//!     &resource.to_nagios_string(),
//!     "WARNING: Input Voltage 180000 mV\n|'mvolts_1'=180000;200000;150000"
//! );
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::process;

pub mod checks;
pub mod cli;
pub mod config_generator;
mod error;
mod runner;
pub mod snmp;

pub use crate::error::{Error, Result};
pub use crate::runner::{safe_run, RunnerResult};

/// A Resource is the outcome of one check run: the lines shown to the operator, the results
/// that decide the state, and whether their perfdata ends up in the output.
///
/// If no state is set manually, it is determined from the pushed results.
#[derive(Debug, Default)]
pub struct Resource {
    state: Option<ServiceState>,
    description: Vec<String>,
    results: Vec<CheckResult>,
    perfdata: bool,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the state, disabling the determination from the pushed results.
    pub fn with_state(mut self, state: ServiceState) -> Self {
        self.set_state(state);
        self
    }

    pub fn set_state(&mut self, state: ServiceState) {
        self.state = Some(state)
    }

    /// Appends a line to the description. Lines are printed in the order they were added.
    pub fn with_description(mut self, line: impl Into<String>) -> Self {
        self.push_description(line);
        self
    }

    pub fn push_description(&mut self, line: impl Into<String>) {
        self.description.push(line.into())
    }

    pub fn with_result(mut self, result: impl Into<CheckResult>) -> Self {
        self.push_result(result);
        self
    }

    pub fn push_result(&mut self, result: impl Into<CheckResult>) {
        self.results.push(result.into())
    }

    /// Perfdata is left out of the output unless enabled.
    pub fn with_perfdata(mut self, enabled: bool) -> Self {
        self.perfdata = enabled;
        self
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Returns the manually set state, or else the worst state of the pushed results.
    ///
    /// Results without a state are ignored. Without any state at all this is
    /// [ServiceState::Unknown].
    pub fn state(&self) -> ServiceState {
        if let Some(state) = self.state {
            return state;
        }

        self.results
            .iter()
            .filter_map(CheckResult::state)
            .fold(ServiceState::Unknown, Ord::max)
    }

    /// Returns the text nagios reads: the state with the description on the first line, and the
    /// perfdata on a line starting with `|` if enabled and present.
    pub fn to_nagios_string(&self) -> String {
        let mut s = format!("{}: {}", self.state(), self.description.join("\n"));

        let perf: Vec<&str> = self
            .results
            .iter()
            .filter_map(CheckResult::perf_string)
            .collect();

        if self.perfdata && !perf.is_empty() {
            s.push_str("\n|");
            s.push_str(&perf.join(" "));
        }

        s
    }

    pub fn exit_code(&self) -> i32 {
        self.state().exit_code()
    }

    /// Prints [Self::to_nagios_string] and exits with [Self::exit_code].
    pub fn print_and_exit(&self) -> ! {
        println!("{}", self.to_nagios_string());
        process::exit(self.exit_code());
    }
}

/// Represents a service state from nagios.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// Returns the corresponding nagios exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Orders by severity of a successful reading: a real WARNING or CRITICAL always beats UNKNOWN.
impl Ord for ServiceState {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = |state: &ServiceState| match state {
            ServiceState::Unknown => 0,
            ServiceState::Ok => 1,
            ServiceState::Warning => 2,
            ServiceState::Critical => 3,
        };

        rank(self).cmp(&rank(other))
    }
}

impl PartialOrd for ServiceState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Which side of a threshold raises an alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerIfValue {
    /// Alarm when the value is above the threshold.
    Greater,
    /// Alarm when the value is below the threshold.
    Less,
}

impl TriggerIfValue {
    /// Compares `value` against the thresholds. Comparisons are strict, so a value equal to a
    /// threshold does not trigger it. A missing threshold never triggers.
    ///
    /// ```rust
    /// # use check_adva::{ServiceState, TriggerIfValue};
    /// let trigger = TriggerIfValue::Greater;
    /// assert_eq!(trigger.evaluate(&15, Some(&10), Some(&20)), ServiceState::Warning);
    /// assert_eq!(trigger.evaluate(&20, Some(&10), Some(&20)), ServiceState::Warning);
    /// assert_eq!(trigger.evaluate(&21, Some(&10), Some(&20)), ServiceState::Critical);
    /// ```
    pub fn evaluate<T: PartialOrd>(
        self,
        value: &T,
        warning: Option<&T>,
        critical: Option<&T>,
    ) -> ServiceState {
        let triggers = |threshold: &T| match self {
            TriggerIfValue::Greater => value > threshold,
            TriggerIfValue::Less => value < threshold,
        };

        if critical.is_some_and(triggers) {
            ServiceState::Critical
        } else if warning.is_some_and(triggers) {
            ServiceState::Warning
        } else {
            ServiceState::Ok
        }
    }
}

/// A single measured value, optionally with thresholds that decide its state.
#[derive(Clone, Debug)]
pub struct Metric<T> {
    name: String,
    value: T,
    warning: Option<T>,
    critical: Option<T>,
    trigger: Option<TriggerIfValue>,
}

impl<T> Metric<T>
where
    T: PartialOrd + fmt::Display,
{
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Metric {
            name: name.into(),
            value,
            warning: None,
            critical: None,
            trigger: None,
        }
    }

    pub fn with_thresholds(
        mut self,
        warning: Option<T>,
        critical: Option<T>,
        trigger: TriggerIfValue,
    ) -> Self {
        self.warning = warning;
        self.critical = critical;
        self.trigger = Some(trigger);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// None if no thresholds were given.
    pub fn state(&self) -> Option<ServiceState> {
        self.trigger.map(|trigger| {
            trigger.evaluate(&self.value, self.warning.as_ref(), self.critical.as_ref())
        })
    }

    /// Formats the metric as `'label'=value;warn;crit`, leaving missing thresholds empty and
    /// trimming trailing empty fields.
    pub fn to_perf_string(&self) -> String {
        let label = self.name.replace('=', "_").replace('\'', "''");

        let field = |v: &Option<T>| v.as_ref().map(ToString::to_string).unwrap_or_default();
        let s = format!(
            "'{}'={};{};{}",
            label,
            self.value,
            field(&self.warning),
            field(&self.critical)
        );

        s.trim_end_matches(';').to_string()
    }
}

/// The type-erased form of a [Metric] as stored in a [Resource].
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    state: Option<ServiceState>,
    perf_string: Option<String>,
}

impl CheckResult {
    /// A result which only contributes a state, no perfdata.
    pub fn new(state: ServiceState) -> Self {
        CheckResult {
            state: Some(state),
            perf_string: None,
        }
    }

    pub fn state(&self) -> Option<ServiceState> {
        self.state
    }

    pub fn perf_string(&self) -> Option<&str> {
        self.perf_string.as_deref()
    }
}

impl<T> From<Metric<T>> for CheckResult
where
    T: PartialOrd + fmt::Display,
{
    fn from(metric: Metric<T>) -> Self {
        CheckResult {
            state: metric.state(),
            perf_string: Some(metric.to_perf_string()),
        }
    }
}

impl From<ServiceState> for CheckResult {
    fn from(state: ServiceState) -> Self {
        CheckResult::new(state)
    }
}
