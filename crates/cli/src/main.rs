//! myohapticctl - EMG haptic paddle controller CLI
//!
//! Runs the control loop against a simulated rig (synthetic EMG electrode and
//! a spring-damper paddle), validates configuration documents and lists the
//! telemetry signals a monitoring host can read or write.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod sim;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{ConfigCommands, RunArgs};
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "myohapticctl")]
#[command(about = "EMG-driven haptic paddle controller - simulate, configure and inspect")]
#[command(version)]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the control loop against the simulated rig
    Run(RunArgs),

    /// Configuration document commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List the telemetry signals and their access
    Signals,
}

fn log_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("myohapticctl={level},myohaptic_controller={level}")
}

fn execute(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Run(args) => commands::run(args, cli.json),
        Commands::Config(cmd) => commands::config(cmd, cli.json),
        Commands::Signals => commands::signals(cli.json),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match execute(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            let code = e.exit_code();
            if cli.json {
                let body = json!({
                    "success": false,
                    "error": { "message": e.to_string(), "exit_code": code }
                });
                match serde_json::to_string_pretty(&body) {
                    Ok(s) => println!("{s}"),
                    Err(err) => eprintln!("Failed to format error as JSON: {err}"),
                }
            } else {
                let e = anyhow::Error::from(e);
                eprintln!("Error: {e}");
                for cause in e.chain().skip(1) {
                    eprintln!("  Caused by: {cause}");
                }
            }
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_run_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["myohapticctl", "run"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        let Commands::Run(args) = cli.command else {
            return Err("expected run".into());
        };
        assert!((args.duration - 10.0).abs() < 1e-12);
        assert!(args.switches.is_empty());
        assert!(args.mode.is_none());
        assert!(!args.realtime);
        Ok(())
    }

    #[test]
    fn parse_run_with_switches() -> TestResult {
        let cli = Cli::try_parse_from([
            "myohapticctl",
            "--json",
            "-vv",
            "run",
            "--duration",
            "3",
            "-s",
            "1@0.5",
            "--switch",
            "2@2",
            "--mode",
            "0",
        ])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            return Err("expected run".into());
        };
        assert_eq!(args.switches.len(), 2);
        assert_eq!(args.switches.first().map(|s| s.selector), Some(1));
        assert_eq!(args.mode, Some(0));
        Ok(())
    }

    #[test]
    fn bad_switch_is_a_usage_error() {
        let result = Cli::try_parse_from(["myohapticctl", "run", "--switch", "fast"]);
        assert!(result.is_err_and(|e| e.kind() == clap::error::ErrorKind::ValueValidation));
    }

    #[test]
    fn parse_config_validate() -> TestResult {
        let cli = Cli::try_parse_from(["myohapticctl", "config", "validate", "rig.json"])?;
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Validate { ref path }) if path.ends_with("rig.json")
        ));
        Ok(())
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert!(log_filter(0).contains("=warn"));
        assert!(log_filter(1).contains("=info"));
        assert!(log_filter(2).contains("=debug"));
        assert!(log_filter(9).contains("=trace"));
    }
}
