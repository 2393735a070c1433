//! Command relay between the panel thread and the host shell
//!
//! The panel enqueues fully-formed command strings; a dedicated processor
//! thread blocks on the channel and executes each one in order. Shutdown
//! travels in-band as a tagged message rather than a magic string, and the
//! whole apparatus is owned by a [`RelayHandle`] whose drop guarantees
//! teardown. A stopped relay is never restarted; launching again builds a
//! fresh channel, thread and state from scratch.

mod processor;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error};

use crate::host::CommandExecutor;

/// Message carried on the relay channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// An opaque shell command string to execute on the host
    Command(String),
    /// Stop the processor; terminal for the relay
    Shutdown,
}

/// Processor lifecycle state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Running,
    Stopped,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_STOPPED: u8 = 2;

/// Shared lifecycle flag between the handle and the processor thread
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(STATE_IDLE))
    }

    pub(crate) fn set(&self, state: RelayState) {
        let raw = match state {
            RelayState::Idle => STATE_IDLE,
            RelayState::Running => STATE_RUNNING,
            RelayState::Stopped => STATE_STOPPED,
        };
        self.0.store(raw, Ordering::SeqCst);
    }

    pub(crate) fn get(&self) -> RelayState {
        match self.0.load(Ordering::SeqCst) {
            STATE_RUNNING => RelayState::Running,
            STATE_STOPPED => RelayState::Stopped,
            _ => RelayState::Idle,
        }
    }
}

/// Cloneable producer handle handed to the panel.
///
/// Sends are unbounded and never block. They also never fail while the
/// owning [`RelayHandle`] is alive: the handle keeps a receiver clone, so
/// enqueuing stays accepted even after the processor stopped (those
/// messages are simply never drained).
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<RelayMessage>,
}

impl CommandSender {
    /// Enqueue an ordinary command string.
    pub fn send_command(&self, command: impl Into<String>) {
        let command = command.into();
        if self.tx.send(RelayMessage::Command(command)).is_err() {
            // Only possible once every receiver is gone, i.e. the relay
            // handle itself was dropped.
            debug!("relay channel gone, command discarded");
        }
    }

    /// Wrap a raw channel sender; used by tests that inspect the queue
    /// directly instead of going through a launched relay.
    #[cfg(test)]
    pub(crate) fn from_raw(tx: Sender<RelayMessage>) -> Self {
        Self { tx }
    }

    /// Enqueue the shutdown signal.
    pub(crate) fn send_shutdown(&self) {
        if self.tx.send(RelayMessage::Shutdown).is_err() {
            debug!("relay channel gone, shutdown signal discarded");
        }
    }
}

/// Factory for the relay apparatus
pub struct CommandRelay;

impl CommandRelay {
    /// Build the channel, spawn the processor thread and return the
    /// owning handle.
    pub fn launch<E>(executor: E) -> RelayHandle
    where
        E: CommandExecutor + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let state = Arc::new(StateCell::new());

        let thread_rx = rx.clone();
        let thread_state = Arc::clone(&state);
        let worker = std::thread::Builder::new()
            .name("relay-processor".into())
            .spawn(move || processor::run(thread_rx, executor, thread_state))
            .expect("failed to spawn relay processor thread");

        RelayHandle {
            tx,
            keepalive_rx: rx,
            state,
            worker: Mutex::new(Some(worker)),
        }
    }
}

/// Owning handle for the relay: channel, processor thread and state.
///
/// Dropping the handle shuts the relay down.
pub struct RelayHandle {
    tx: Sender<RelayMessage>,
    // Keeps sends accepted after the processor's receiver is gone.
    #[allow(dead_code)]
    keepalive_rx: Receiver<RelayMessage>,
    state: Arc<StateCell>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RelayHandle {
    /// Hand out a producer handle for the panel.
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Current processor state.
    pub fn state(&self) -> RelayState {
        self.state.get()
    }

    /// Stop the processor and release its thread.
    ///
    /// Idempotent: the second and later calls (including the one from
    /// `Drop`) find the thread already taken and return immediately. Also
    /// safe when the processor stopped itself on a queued shutdown
    /// message; the join then completes right away.
    pub fn shutdown(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(worker) = worker else {
            debug!("relay already shut down");
            return;
        };

        if self.tx.send(RelayMessage::Shutdown).is_err() {
            debug!("relay channel gone before shutdown signal");
        }

        if worker.join().is_err() {
            error!("relay processor thread panicked");
        }
        // The processor normally records this itself; make it hold even
        // after a panic.
        self.state.set(RelayState::Stopped);
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
