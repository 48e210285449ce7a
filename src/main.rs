mod setup;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use services::errors::ErrorCollection;
use setup::{set_up_tracing, set_up_validators};

#[derive(Parser, Debug)]
#[command(name = "ccm-accounts", version, about = "Password policy helpers")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the active password requirements, one per line
    Requirements,
    /// Validate a password and print the errors
    Check {
        /// Candidate password; put it after `--` if it starts with a dash
        password: String,
        /// Output format for the error list
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Html,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    set_up_tracing();

    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let provider = set_up_validators();
    let manager = provider.manager().map_err(|e| e.to_string())?;

    match cli.cmd {
        Command::Requirements => {
            for requirement in manager.requirement_strings() {
                println!("{}", requirement);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { password, format } => {
            let mut errors = ErrorCollection::new();
            let valid = manager.is_valid_for(&password, None, &mut errors);
            tracing::info!(valid, errors = errors.len(), "password checked");

            print_errors(&errors, format).map_err(|e| format!("failed to write output: {}", e))?;
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
    }
}

fn print_errors(errors: &ErrorCollection, format: Format) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        Format::Text => {
            for message in errors {
                writeln!(out, "{}", message)?;
            }
        }
        Format::Html => {
            errors.output_html(&mut out)?;
            if errors.has() {
                writeln!(out)?;
            }
        }
        Format::Json => {
            errors.output_json(&mut out)?;
            if errors.has() {
                writeln!(out)?;
            }
        }
    }
    out.flush()
}
