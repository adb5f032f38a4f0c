//! Main application entry point.
//!
//! Parses the command line, dispatches to a command and turns an error into a
//! logged error block and a non-zero exit code.

use sunpredict::args::{self, CliAction, ParsedArgs};
use sunpredict::commands;
use sunpredict::constants::EXIT_FAILURE;
use sunpredict::{log_end, log_error_exit, log_indented};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::InvalidArguments { message } => {
            log_error_exit!("{}", message);
            log_indented!("Run 'sunpredict --help' for usage");
            log_end!();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => {
            commands::help::run_help_command(command.as_deref());
            Ok(())
        }
        CliAction::Predict(options) => commands::predict::run_predict_command(&options),
    };

    if let Err(e) = result {
        log_error_exit!("{:#}", e);
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}
