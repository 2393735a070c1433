//! RackPanel - operator panel for rack consoles
//!
//! Presents per-rack actions (open an SSH console, probe the controller
//! status endpoint) and relays each action as a shell command string to a
//! host-side processor over a channel. The panel runs on its own thread;
//! the processor drains the channel and executes commands in the host
//! shell until it receives a shutdown signal.

mod cli;
mod host;
mod logging;
mod panel;
mod relay;
mod settings;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cli::{exit_codes, Cli, Commands, LaunchArgs};
use host::ShellExecutor;
use panel::{SessionContext, SessionPanel};
use relay::CommandRelay;
use settings::PanelSettings;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = logging::init(cli.verbose, cli.json_output) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    match cli.command {
        Commands::Launch(args) => match launch(args) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                categorize_error(&e)
            }
        },
    }
}

/// Wire settings, executor, relay and panel together, then hand the
/// panel thread the terminal until the operator quits.
fn launch(args: LaunchArgs) -> anyhow::Result<()> {
    let settings =
        PanelSettings::load(args.config.as_deref()).context("failed to load settings")?;

    let user = args.user.unwrap_or_else(|| settings.default_user.clone());
    let ctx = SessionContext {
        rack: args.rack,
        address: args.address,
        user,
    };

    info!(rack = %ctx.rack, address = %ctx.address, "launching operator panel");

    let executor = ShellExecutor::new()?;
    let relay = CommandRelay::launch(executor);
    let panel = SessionPanel::new(&settings, ctx, relay.sender());

    // The panel gets its own thread, mirroring a dialog's dedicated UI
    // context. The processor thread inside the relay plays the host side.
    let ui = std::thread::Builder::new()
        .name("panel-ui".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            panel.run_console_loop(stdin.lock());
        })
        .context("failed to spawn panel thread")?;

    ui.join()
        .map_err(|_| anyhow::anyhow!("panel thread panicked"))?;

    relay.shutdown();
    info!("operator panel closed");
    Ok(())
}

/// Categorize an error into the appropriate exit code
fn categorize_error(e: &anyhow::Error) -> i32 {
    let msg = e.to_string().to_lowercase();

    if msg.contains("not found") || msg.contains("shell") {
        exit_codes::SHELL_MISSING
    } else if msg.contains("settings") || msg.contains("parse") || msg.contains("config") {
        exit_codes::CONFIG_ERROR
    } else {
        exit_codes::UNEXPECTED_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_shell_missing() {
        let e = anyhow::anyhow!("host shell 'cmd' not found. Install it or add to PATH.");
        assert_eq!(categorize_error(&e), exit_codes::SHELL_MISSING);
    }

    #[test]
    fn test_categorize_config_error() {
        let e = anyhow::anyhow!("failed to parse settings file");
        assert_eq!(categorize_error(&e), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_categorize_fallback() {
        let e = anyhow::anyhow!("something else went wrong");
        assert_eq!(categorize_error(&e), exit_codes::UNEXPECTED_FAILURE);
    }
}
