//! The single command-processing context.

use tokio::sync::mpsc;

use crate::core::ProbeScheduler;
use crate::probe::Probe;

use super::Command;

/// Why the command loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// User asked to quit; probing was stopped cleanly.
    Quit,
    /// Every sender was dropped.
    Disconnected,
}

/// Apply commands one at a time until `Quit` or until the queue closes.
pub async fn run_command_loop<P: Probe>(
    scheduler: &ProbeScheduler<P>,
    mut commands: mpsc::Receiver<Command>,
) -> LoopExit {
    while let Some(command) = commands.recv().await {
        tracing::debug!(?command, "Handling command");
        match command {
            Command::SetInterval(interval) => scheduler.set_interval(interval),
            Command::Start => scheduler.start(),
            Command::Stop => scheduler.stop(),
            Command::ToggleAutoStart => scheduler.toggle_auto_start(),
            Command::Quit => {
                scheduler.quit();
                return LoopExit::Quit;
            }
        }
    }
    tracing::info!("Command queue closed");
    LoopExit::Disconnected
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::commands::command_channel;
    use crate::core::scheduler::tests::{harness, ScriptedProbe, SurfaceEvent};
    use crate::core::ProbeStatus;
    use crate::settings::ProbeInterval;

    #[tokio::test(start_paused = true)]
    async fn test_commands_drive_scheduler_until_quit() {
        let h = harness(ScriptedProbe::default());
        let (sender, rx) = command_channel();
        sender.send(Command::SetInterval(ProbeInterval::from_secs(10).unwrap()));
        sender.send(Command::Start);
        sender.send(Command::Start);
        sender.send(Command::ToggleAutoStart);
        sender.send(Command::Quit);
        sender.send(Command::Start);

        let exit = run_command_loop(&h.scheduler, rx).await;
        assert_eq!(exit, LoopExit::Quit);
        assert!(!h.scheduler.is_running());
        assert_eq!(h.scheduler.status(), ProbeStatus::Stopped);

        let stored = h.store.load();
        assert_eq!(stored.interval.secs(), 10);
        assert!(stored.auto_start);
        assert!(!stored.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_handled_while_probe_in_flight() {
        let h = harness(ScriptedProbe::default().with_delay(Duration::from_secs(4)));
        let (sender, rx) = command_channel();
        h.scheduler.start();

        let driver = async {
            tokio::time::sleep(Duration::from_secs(6)).await;
            assert_eq!(h.calls.load(Ordering::SeqCst), 1);
            sender.send(Command::Stop);
            tokio::time::sleep(Duration::from_millis(10)).await;
            // Stop took effect before the in-flight probe would resolve (t=9).
            assert!(!h.scheduler.is_running());
            tokio::time::sleep(Duration::from_secs(20)).await;
            drop(sender);
        };
        let (exit, ()) = tokio::join!(run_command_loop(&h.scheduler, rx), driver);

        assert_eq!(exit, LoopExit::Disconnected);
        assert_eq!(h.scheduler.settings().total_bytes, 0);
        assert!(h
            .surface
            .events()
            .ends_with(&[SurfaceEvent::Status(ProbeStatus::Stopped), SurfaceEvent::Running(false)]));
    }
}
