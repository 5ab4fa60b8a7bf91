//! Background service lifecycle management.
//!
//! `BackgroundServices` builds the scheduler on the async runtime, restores the
//! previous session, and then owns the command loop until the user quits.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::autostart::AutoStart;
use crate::commands::{run_command_loop, Command, LoopExit};
use crate::core::{ControlSurface, ProbeScheduler};
use crate::probe::Probe;
use crate::settings::SettingsStore;

/// Everything the scheduler needs, handed over from the shell.
pub struct BackgroundServices<P: Probe> {
    pub store: SettingsStore,
    pub probe: P,
    pub surface: Arc<dyn ControlSurface>,
    pub auto_start: Arc<dyn AutoStart>,
}

impl<P: Probe> BackgroundServices<P> {
    /// Run until `Quit` or until every command sender is dropped.
    ///
    /// Order matters:
    /// 1. Load settings and build the scheduler.
    /// 2. Push the initial view and resume probing if it was active.
    /// 3. Serve commands.
    pub async fn run(self, commands: mpsc::Receiver<Command>) -> LoopExit {
        let scheduler = ProbeScheduler::new(self.store, self.probe, self.surface, self.auto_start);
        scheduler.initialize();
        let exit = run_command_loop(&scheduler, commands).await;
        tracing::info!(?exit, "Background services finished");
        exit
    }
}
