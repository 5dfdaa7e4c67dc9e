//! Generates an Icinga2 `CheckCommand` object from the command line definition, so the command
//! config never drifts from the flags the plugin actually accepts.

/// One command line option as Icinga has to pass it.
struct CommandArgument {
    flag: String,
    var: String,
    description: Option<String>,
    is_switch: bool,
    required: bool,
    default_value: Option<String>,
}

pub struct CommandDescription {
    arguments: Vec<CommandArgument>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigGeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid executable path")]
    InvalidExecutablePath,
    #[error("argument '{0}' has no long flag")]
    MissingLongArgument(String),
}

impl CommandDescription {
    /// Describes every argument of `cmd`. Icinga custom variables are named `<prefix>_<flag>`.
    pub fn new(prefix: &str, cmd: &clap::Command) -> Result<Self, ConfigGeneratorError> {
        let arguments = cmd
            .get_arguments()
            .map(|arg| {
                let long = arg.get_long().ok_or_else(|| {
                    ConfigGeneratorError::MissingLongArgument(arg.get_id().to_string())
                })?;
                let is_switch = !arg.get_action().takes_values();

                Ok(CommandArgument {
                    flag: format!("--{long}"),
                    var: format!("{}_{}", prefix, long.replace('-', "_")),
                    description: arg.get_help().map(ToString::to_string),
                    is_switch,
                    required: arg.is_required_set(),
                    default_value: arg
                        .get_default_values()
                        .first()
                        .filter(|_| !is_switch)
                        .and_then(|v| v.to_str())
                        .map(ToString::to_string),
                })
            })
            .collect::<Result<_, ConfigGeneratorError>>()?;

        Ok(CommandDescription { arguments })
    }

    pub fn to_icinga_command(&self, name: &str, executable: &str) -> String {
        let mut out = format!("object CheckCommand \"{name}\" {{\n");
        out.push_str(&format!("  command = [ \"{}\" ]\n", escape_string(executable)));
        out.push_str("  arguments = {\n");

        for arg in &self.arguments {
            out.push_str(&format!("    \"{}\" = {{\n", arg.flag));
            if arg.is_switch {
                out.push_str(&format!("      set_if = \"${}$\"\n", arg.var));
            } else {
                out.push_str(&format!("      value = \"${}$\"\n", arg.var));
            }
            if arg.required {
                out.push_str("      required = true\n");
            }
            if let Some(description) = &arg.description {
                out.push_str(&format!(
                    "      description = \"{}\"\n",
                    escape_string(description)
                ));
            }
            out.push_str("    }\n");
        }
        out.push_str("  }\n");

        for arg in &self.arguments {
            if let Some(default_value) = &arg.default_value {
                out.push_str(&format!(
                    "  vars.{} = \"{}\"\n",
                    arg.var,
                    escape_string(default_value)
                ));
            }
        }

        out.push_str("}\n");
        out
    }
}

fn escape_string(s: &str) -> String {
    ["\\", "\"", "$"]
        .iter()
        .fold(s.to_string(), |acc, c| acc.replace(c, &format!("\\{c}")))
}

/// Prints the Icinga command configuration and exits if the GENERATE_ICINGA_COMMAND environment
/// variable is set. The plugin is referenced by the path of the running executable.
pub fn print_icinga_command_config_if_env_and_exit(
    name: &str,
    cmd: &clap::Command,
) -> Result<(), ConfigGeneratorError> {
    if std::env::var_os("GENERATE_ICINGA_COMMAND").is_none() {
        return Ok(());
    }

    let executable = std::env::current_exe()?
        .to_str()
        .ok_or(ConfigGeneratorError::InvalidExecutablePath)?
        .to_owned();

    let description = CommandDescription::new(name, cmd)?;
    println!("{}", description.to_icinga_command(name, &executable).trim());
    std::process::exit(0);
}
