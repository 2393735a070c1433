//! CLI definitions and process exit codes

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Exit codes reported to the calling shell
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    /// Host shell (cmd/sh) could not be found
    pub const SHELL_MISSING: i32 = 2;
    /// Settings file missing or malformed
    pub const CONFIG_ERROR: i32 = 3;
}

/// RackPanel - operator panel for rack consoles
#[derive(Parser, Debug)]
#[command(name = "rackpanel", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_output: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open an operator panel for a rack console
    Launch(LaunchArgs),
}

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Rack identifier (e.g. R007)
    #[arg(long, env = "RACKPANEL_RACK")]
    pub rack: String,

    /// Console address (IP or hostname)
    #[arg(long, env = "RACKPANEL_ADDRESS")]
    pub address: String,

    /// SSH user for the console session (defaults to the settings value)
    #[arg(long)]
    pub user: Option<String>,

    /// Path to a settings file (defaults to the platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_args_required() {
        let cli = Cli::parse_from([
            "rackpanel",
            "launch",
            "--rack",
            "R007",
            "--address",
            "192.168.1.101",
        ]);
        let Commands::Launch(args) = cli.command;
        assert_eq!(args.rack, "R007");
        assert_eq!(args.address, "192.168.1.101");
        assert!(args.user.is_none());
        assert!(args.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_launch_rejects_missing_address() {
        let result = Cli::try_parse_from(["rackpanel", "launch", "--rack", "R007"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "rackpanel",
            "launch",
            "--rack",
            "R1",
            "--address",
            "10.0.0.5",
            "--verbose",
            "--json-output",
        ]);
        assert!(cli.verbose);
        assert!(cli.json_output);
    }

    #[test]
    fn test_no_format_validation_on_context() {
        // Presence is the only validation; odd values pass through verbatim.
        let cli = Cli::parse_from([
            "rackpanel",
            "launch",
            "--rack",
            "not a rack; rm -rf",
            "--address",
            "???",
        ]);
        let Commands::Launch(args) = cli.command;
        assert_eq!(args.rack, "not a rack; rm -rf");
        assert_eq!(args.address, "???");
    }
}
