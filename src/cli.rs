use std::time::Duration;

use clap::{Parser, ValueEnum};
use simplelog::LevelFilter;

use crate::checks::{Check, Settings};

/// Nagios check for ADVA FSP devices
#[derive(Debug, Parser)]
#[command(name = "check_adva", version)]
pub struct Cli {
    /// Hostname or IP address, optionally followed by :port
    #[arg(short = 'H', long)]
    pub hostname: String,
    /// SNMP community (currently only v2c)
    #[arg(short = 'C', long)]
    pub community: String,
    /// Operational mode
    #[arg(short, long, value_enum)]
    pub mode: Mode,
    /// Optional argument 1 (eg. node name), not used by any mode yet
    #[arg(short = 'x', long)]
    pub arg1: Option<String>,
    /// Enable perfdata
    #[arg(short, long)]
    pub perfdata: bool,
    /// Warning trigger in mV (voltage mode)
    #[arg(short, long, allow_negative_numbers = true)]
    pub warning: Option<i64>,
    /// Critical trigger in mV (voltage mode)
    #[arg(short, long, allow_negative_numbers = true)]
    pub critical: Option<i64>,
    /// SNMP timeout in seconds
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
    /// Increase verbosity of the log on stderr, up to -vvvv
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Print the long help
    Help,
    Temperature,
    Voltage,
    Amperage,
    Alarms,
}

impl Mode {
    /// The check to run, None for help.
    pub fn check(self) -> Option<Check> {
        match self {
            Mode::Help => None,
            Mode::Temperature => Some(Check::Temperature),
            Mode::Voltage => Some(Check::Voltage),
            Mode::Amperage => Some(Check::Amperage),
            Mode::Alarms => Some(Check::Alarms),
        }
    }
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            perfdata: self.perfdata,
            warning: self.warning,
            critical: self.critical,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Off,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            4.. => LevelFilter::Trace,
        }
    }
}

/// The text printed for `--mode help`.
pub fn long_help() -> String {
    let mut s = String::from("ADVA FSP Nagios plugin\n======================\n\n");

    s.push_str("-= modes =-\n-----------\n");
    s.push_str("* help - this help\n");
    for check in Check::ALL {
        s.push_str(&format!("* {} - {}\n", check.name(), check.summary()));
    }

    for check in Check::ALL {
        s.push_str(&format!(
            "\n-= {name} =-\n{line}\n{help}\n",
            name = check.name(),
            line = "-".repeat(check.name().len() + 6),
            help = check.help()
        ));
    }

    s.push_str(&format!(
        "\n---\nCopyright {} under {} license",
        env!("CARGO_PKG_AUTHORS"),
        env!("CARGO_PKG_LICENSE")
    ));

    s
}
