//! Session panel - the operator-facing command source
//!
//! Holds the session context for one rack console and turns operator
//! actions into fully-formed shell command strings pushed onto the relay.
//! Closing the panel enqueues the shutdown signal exactly once, no matter
//! how it is closed (explicitly, via the console loop, or by drop).

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::relay::CommandSender;
use crate::settings::PanelSettings;

/// The (rack, address, user) triple the panel was launched with.
///
/// Raw text throughout: values substitute into command templates verbatim,
/// with no escaping or format validation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub rack: String,
    pub address: String,
    pub user: String,
}

/// Substitute `{rack}`, `{address}` and `{user}` placeholders.
fn render_template(template: &str, ctx: &SessionContext) -> String {
    template
        .replace("{rack}", &ctx.rack)
        .replace("{address}", &ctx.address)
        .replace("{user}", &ctx.user)
}

/// The panel: one rack console session, two actions, one close hook.
pub struct SessionPanel {
    sender: CommandSender,
    ctx: SessionContext,
    console_command: String,
    status_command: String,
    closed: AtomicBool,
}

impl SessionPanel {
    pub fn new(settings: &PanelSettings, ctx: SessionContext, sender: CommandSender) -> Self {
        let console_command = render_template(&settings.console_template, &ctx);
        let status_command = render_template(&settings.status_template, &ctx);
        Self {
            sender,
            ctx,
            console_command,
            status_command,
            closed: AtomicBool::new(false),
        }
    }

    /// Action: open an SSH console session to the rack.
    pub fn open_console(&self) {
        debug!(command = %self.console_command, "console action");
        self.sender.send_command(self.console_command.clone());
    }

    /// Action: probe the rack controller's status endpoint.
    pub fn probe_status(&self) {
        debug!(command = %self.status_command, "status action");
        self.sender.send_command(self.status_command.clone());
    }

    /// Lifecycle hook: enqueue the shutdown signal.
    ///
    /// Fires exactly once; later calls (including the one from drop) are
    /// no-ops.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("panel closed, signalling shutdown");
            self.sender.send_shutdown();
        }
    }

    /// Interactive loop standing in for the dialog's button surface.
    ///
    /// Reads operator commands line by line until `quit` or end of input,
    /// then closes the panel.
    pub fn run_console_loop<R: BufRead>(&self, input: R) {
        println!(
            "Rack {} @ {} (user {})",
            self.ctx.rack, self.ctx.address, self.ctx.user
        );
        println!("  c | console  open SSH console");
        println!("  s | status   probe controller status");
        println!("  q | quit     close the panel");

        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "failed to read panel input");
                    break;
                }
            };
            match line.trim() {
                "c" | "console" => self.open_console(),
                "s" | "status" => self.probe_status(),
                "q" | "quit" | "exit" => break,
                "" => {}
                other => println!("unknown command: {other}"),
            }
        }

        self.close();
    }
}

impl Drop for SessionPanel {
    fn drop(&mut self) {
        self.close();
    }
}
