//! User commands flowing from the control surface into the scheduler.
//!
//! - `logic`: Pure menu-id ↔ command mapping (unit-testable without a tray)
//! - `dispatch`: The single command-processing loop

mod dispatch;
pub(crate) mod logic;

use tokio::sync::mpsc;

use crate::config;
use crate::settings::ProbeInterval;

pub use dispatch::{run_command_loop, LoopExit};
pub use logic::{interval_menu_id, parse_menu_id};

/// One discrete request from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetInterval(ProbeInterval),
    Start,
    Stop,
    ToggleAutoStart,
    Quit,
}

/// Non-blocking producer side of the command queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<Command>,
}

impl CommandSender {
    /// Queue a command without waiting. Returns false if it was dropped.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(command)) => {
                tracing::warn!(?command, "Command queue full, dropping command");
                false
            }
            Err(mpsc::error::TrySendError::Closed(command)) => {
                tracing::debug!(?command, "Command loop gone, dropping command");
                false
            }
        }
    }
}

/// Bounded queue between the control surface and the command loop.
pub fn command_channel() -> (CommandSender, mpsc::Receiver<Command>) {
    let (tx, rx) = mpsc::channel(config::COMMAND_QUEUE_CAPACITY);
    (CommandSender { tx }, rx)
}
