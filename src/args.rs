//! Command-line argument parsing and processing.
//!
//! Arguments are parsed into a [`CliAction`] without side effects; printing
//! help or errors is left to the caller. Negative numbers are positional
//! values, not flags, so `sunpredict 35.1 -106.6 1600` works unquoted.

use chrono::NaiveDate;

use crate::constants::MAXIMUM_PREDICTION_DAYS;

/// Settings for a prediction run, as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictOptions {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    /// Latitude, longitude and elevation, overriding `[location]`.
    pub coordinates: Option<(f64, f64, f64)>,
    /// First day to predict; today in the display timezone when absent.
    pub date: Option<NaiveDate>,
    pub days: u32,
    pub terrain_file: Option<String>,
    pub no_terrain: bool,
    pub timezone: Option<String>,
    pub json: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            debug_enabled: false,
            config_dir: None,
            coordinates: None,
            date: None,
            days: 1,
            terrain_file: None,
            no_terrain: false,
            timezone: None,
            json: false,
        }
    }
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute and report visibility windows
    Predict(PredictOptions),
    /// `help [COMMAND]`
    HelpCommand { command: Option<String> },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
    /// A known option was given a value it cannot accept
    InvalidArguments { message: String },
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

fn invalid(message: impl Into<String>) -> ParsedArgs {
    ParsedArgs {
        action: CliAction::InvalidArguments {
            message: message.into(),
        },
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped. Version takes
    /// precedence over help, which takes precedence over everything else.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        if args_vec.first().map(String::as_str) == Some("help") {
            return ParsedArgs {
                action: CliAction::HelpCommand {
                    command: args_vec.get(1).cloned(),
                },
            };
        }

        let mut options = PredictOptions::default();
        let mut positional: Vec<f64> = Vec::new();
        let mut iter = args_vec.iter();

        while let Some(arg) = iter.next() {
            // Options that take a value
            if matches!(
                arg.as_str(),
                "--date" | "--days" | "--terrain" | "--timezone" | "--config" | "-c"
            ) {
                let Some(value) = iter.next() else {
                    return invalid(format!("{arg} requires a value"));
                };
                match arg.as_str() {
                    "--date" => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                        Ok(date) => options.date = Some(date),
                        Err(_) => {
                            return invalid(format!("--date expects YYYY-MM-DD (got '{value}')"));
                        }
                    },
                    "--days" => match value.parse::<u32>() {
                        Ok(days) if (1..=MAXIMUM_PREDICTION_DAYS).contains(&days) => {
                            options.days = days
                        }
                        _ => {
                            return invalid(format!(
                                "--days expects a number from 1 to {MAXIMUM_PREDICTION_DAYS} (got '{value}')"
                            ));
                        }
                    },
                    "--terrain" => options.terrain_file = Some(value.clone()),
                    "--timezone" => options.timezone = Some(value.clone()),
                    _ => options.config_dir = Some(value.clone()),
                }
                continue;
            }

            match arg.as_str() {
                "--debug" | "-d" => options.debug_enabled = true,
                "--json" => options.json = true,
                "--no-terrain" => options.no_terrain = true,
                value => match value.parse::<f64>() {
                    Ok(number) => positional.push(number),
                    Err(_) => {
                        return ParsedArgs {
                            action: CliAction::ShowHelpDueToError,
                        };
                    }
                },
            }
        }

        match positional.as_slice() {
            [] => {}
            &[latitude, longitude, elevation] => {
                options.coordinates = Some((latitude, longitude, elevation))
            }
            _ => {
                return invalid(format!(
                    "expected LATITUDE LONGITUDE ELEVATION, got {} value(s)",
                    positional.len()
                ));
            }
        }

        if options.no_terrain && options.terrain_file.is_some() {
            return invalid("--terrain and --no-terrain cannot be combined");
        }

        ParsedArgs {
            action: CliAction::Predict(options),
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("sunpredict [OPTIONS] [LATITUDE LONGITUDE ELEVATION]");
    log_indented!("sunpredict help [COMMAND]");
    log_block_start!("Options:");
    log_indented!("    --date <YYYY-MM-DD>  First day to predict (default: today)");
    log_indented!("    --days <N>           Number of consecutive days (1-{MAXIMUM_PREDICTION_DAYS})");
    log_indented!("    --terrain <file>     Terrain profile JSON to account for");
    log_indented!("    --no-terrain         Ignore terrain configured in sunpredict.toml");
    log_indented!("    --timezone <tz>      Display timezone (IANA name)");
    log_indented!("    --json               Print the report as JSON");
    log_indented!("-c, --config <dir>       Use custom configuration directory");
    log_indented!("-d, --debug              Enable detailed debug output");
    log_indented!("-h, --help               Print help information");
    log_indented!("-V, --version            Print version information");
    log_end!();
}
