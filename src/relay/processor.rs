//! The host-side consumer loop
//!
//! Blocks on the relay channel and executes commands one at a time in
//! enqueue order. Execution failures are reported and the loop keeps
//! going; a shutdown message, or the disconnect of every sender, ends it.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{debug, error, info};

use super::{RelayMessage, RelayState, StateCell};
use crate::host::CommandExecutor;

pub(crate) fn run<E>(rx: Receiver<RelayMessage>, executor: E, state: Arc<StateCell>)
where
    E: CommandExecutor,
{
    state.set(RelayState::Running);
    debug!("relay processor started");

    loop {
        match rx.recv() {
            Ok(RelayMessage::Command(command)) => {
                debug!(%command, "executing relayed command");
                match executor.execute(&command) {
                    Ok(outcome) => {
                        if !outcome.stdout.is_empty() {
                            print!("{}", outcome.stdout);
                        }
                        info!(%command, exit_code = ?outcome.exit_code, "command finished");
                    }
                    // Non-fatal: report and keep draining. The command is
                    // never retried.
                    Err(e) => error!(%command, error = %e, "command failed"),
                }
            }
            Ok(RelayMessage::Shutdown) => {
                info!("shutdown signal received");
                break;
            }
            Err(_) => {
                // Every sender (panel and handle) is gone; nothing can
                // ever arrive again.
                debug!("relay channel disconnected");
                break;
            }
        }
    }

    state.set(RelayState::Stopped);
    debug!("relay processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ExecError, ExecOutcome};
    use crossbeam_channel::unbounded;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CountingExecutor {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl CommandExecutor for CountingExecutor {
        fn execute(&self, command: &str) -> Result<ExecOutcome, ExecError> {
            self.seen.lock().unwrap().push(command.to_string());
            Ok(ExecOutcome::default())
        }
    }

    #[test]
    fn test_stops_on_shutdown_message() {
        let (tx, rx) = unbounded();
        let state = Arc::new(StateCell::new());
        let executor = CountingExecutor::default();

        tx.send(RelayMessage::Command("one".into())).unwrap();
        tx.send(RelayMessage::Shutdown).unwrap();
        // Anything behind the shutdown signal is never executed.
        tx.send(RelayMessage::Command("two".into())).unwrap();

        run(rx, executor.clone(), Arc::clone(&state));

        assert_eq!(*executor.seen.lock().unwrap(), vec!["one"]);
        assert_eq!(state.get(), RelayState::Stopped);
    }

    #[test]
    fn test_stops_when_all_senders_drop() {
        let (tx, rx) = unbounded::<RelayMessage>();
        let state = Arc::new(StateCell::new());

        tx.send(RelayMessage::Command("only".into())).unwrap();
        drop(tx);

        let executor = CountingExecutor::default();
        run(rx, executor.clone(), Arc::clone(&state));

        assert_eq!(*executor.seen.lock().unwrap(), vec!["only"]);
        assert_eq!(state.get(), RelayState::Stopped);
    }

    #[test]
    fn test_empty_queue_then_shutdown_executes_nothing() {
        let (tx, rx) = unbounded();
        let state = Arc::new(StateCell::new());

        tx.send(RelayMessage::Shutdown).unwrap();

        let executor = CountingExecutor::default();
        run(rx, executor.clone(), Arc::clone(&state));

        assert!(executor.seen.lock().unwrap().is_empty());
        assert_eq!(state.get(), RelayState::Stopped);
    }
}
