use std::process;

use clap::{CommandFactory, Parser};
use log::{debug, info};

use check_adva::cli::{self, Cli};
use check_adva::config_generator::print_icinga_command_config_if_env_and_exit;
use check_adva::snmp::Session;
use check_adva::{safe_run, ServiceState};

fn main() {
    if let Err(e) = print_icinga_command_config_if_env_and_exit("adva_fsp", &Cli::command()) {
        println!("{}: {}", ServiceState::Unknown, e);
        process::exit(ServiceState::Unknown.exit_code());
    }

    // clap exits with 2 on bad arguments, which nagios would read as CRITICAL.
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(ServiceState::Unknown.exit_code());
        }
    };

    if let Err(e) = simplelog::TermLogger::init(
        args.log_level(),
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    ) {
        eprintln!("Error: failed to initialize logging: {}", e);
    }

    let Some(check) = args.mode.check() else {
        println!("{}", cli::long_help());
        process::exit(0);
    };

    if let Some(arg1) = &args.arg1 {
        debug!("ignoring --arg1 {arg1:?}, no mode uses it");
    }

    info!("running {} check against {}", check.name(), args.hostname);

    safe_run(
        || {
            let mut session = Session::new_v2c(&args.hostname, &args.community, args.timeout())?;
            check.run(&mut session, &args.settings())
        },
        ServiceState::Unknown,
    )
    .print_and_exit()
}
