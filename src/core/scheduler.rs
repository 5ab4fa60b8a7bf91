//! Probe scheduler: the start/stop/reconfigure state machine.
//!
//! `ProbeScheduler` owns the settings, the observable status, and the handle of
//! the one periodic probe loop. Every transition runs under a single mutex, so
//! the command loop and the probe loop never mutate state at the same time.
//!
//! The probe itself runs outside the lock. When it resolves, the loop re-takes
//! the lock and applies the outcome only if its cancellation token is still
//! live. `stop()` and interval changes cancel that token while holding the
//! lock, so once they return no late result can touch the counter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::autostart::AutoStart;
use crate::core::status::ProbeStatus;
use crate::core::surface::ControlSurface;
use crate::error::AppError;
use crate::probe::Probe;
use crate::settings::{ProbeInterval, Settings, SettingsStore};

/// Handles of the armed probe loop. Present only while running.
struct ProbeLoop {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ProbeLoop {
    fn shutdown(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

struct SchedulerState {
    settings: Settings,
    status: ProbeStatus,
    probe_loop: Option<ProbeLoop>,
}

struct Shared<P> {
    state: Mutex<SchedulerState>,
    store: SettingsStore,
    probe: P,
    surface: Arc<dyn ControlSurface>,
    auto_start: Arc<dyn AutoStart>,
    runtime: tokio::runtime::Handle,
}

/// Periodic keep-alive prober with persisted state.
///
/// Must be created inside a tokio runtime; probe loops are spawned on it.
pub struct ProbeScheduler<P: Probe> {
    shared: Arc<Shared<P>>,
}

impl<P: Probe> ProbeScheduler<P> {
    /// Load settings from `store` and build a stopped scheduler.
    pub fn new(
        store: SettingsStore,
        probe: P,
        surface: Arc<dyn ControlSurface>,
        auto_start: Arc<dyn AutoStart>,
    ) -> Self {
        let settings = store.load();
        tracing::info!(
            interval_secs = settings.interval.secs(),
            total_bytes = settings.total_bytes,
            auto_start = settings.auto_start,
            was_running = settings.is_running,
            "Settings loaded from {}",
            store.path().display()
        );
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState {
                    settings,
                    status: ProbeStatus::Stopped,
                    probe_loop: None,
                }),
                store,
                probe,
                surface,
                auto_start,
                runtime: tokio::runtime::Handle::current(),
            }),
        }
    }

    /// Push the full initial view, then resume probing if it was active last time.
    pub fn initialize(&self) {
        // Querying the OS registration may spawn a subprocess; keep it outside the lock.
        let registered = self.shared.auto_start.is_enabled();
        let resume = {
            let state = self.shared.lock();
            let surface = &self.shared.surface;
            surface.show_status(state.status);
            surface.show_traffic(state.settings.total_bytes);
            surface.show_running(false);
            surface.show_interval(state.settings.interval);
            surface.show_auto_start(state.settings.auto_start);

            if registered != state.settings.auto_start {
                tracing::warn!(
                    persisted = state.settings.auto_start,
                    registered,
                    "Autostart flag differs from OS registration"
                );
            }
            state.settings.is_running
        };

        if resume {
            tracing::info!("Resuming probing from previous session");
            self.start();
        }
    }

    /// Arm the probe loop. No-op when already running.
    pub fn start(&self) {
        let mut state = self.shared.lock();
        if state.probe_loop.is_some() {
            tracing::debug!("start() ignored: already running");
            return;
        }
        let interval = state.settings.interval;
        state.probe_loop = Some(self.spawn_loop(interval));
        state.settings.is_running = true;
        self.shared.store.save_logged(&state.settings);

        state.status = ProbeStatus::Probing;
        self.shared.surface.show_status(state.status);
        self.shared.surface.show_running(true);
        tracing::info!(interval_secs = interval.secs(), "Probing started");
    }

    /// Disarm the probe loop. No-op when already stopped.
    ///
    /// After this returns, no in-flight probe result is applied.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        let Some(probe_loop) = state.probe_loop.take() else {
            tracing::debug!("stop() ignored: already stopped");
            return;
        };
        probe_loop.shutdown();
        state.settings.is_running = false;
        self.shared.store.save_logged(&state.settings);

        state.status = ProbeStatus::Stopped;
        self.shared.surface.show_status(state.status);
        self.shared.surface.show_running(false);
        tracing::info!("Probing stopped");
    }

    /// Change the probe period.
    ///
    /// While running, the loop is replaced in the same critical section: no
    /// `Stopped` status is shown and `is_running` is left untouched.
    pub fn set_interval(&self, interval: ProbeInterval) {
        let mut state = self.shared.lock();
        state.settings.interval = interval;
        self.shared.store.save_logged(&state.settings);
        self.shared.surface.show_interval(interval);

        if let Some(old) = state.probe_loop.take() {
            old.shutdown();
            state.probe_loop = Some(self.spawn_loop(interval));
            tracing::info!(interval_secs = interval.secs(), "Probe loop re-armed");
        } else {
            tracing::info!(interval_secs = interval.secs(), "Probe interval updated");
        }
    }

    /// Flip the autostart flag and mirror it into the OS registration.
    ///
    /// Registration failures are logged only; the requested state is still
    /// persisted and shown. The backend call runs without the state lock held;
    /// commands are applied one at a time, so the flag cannot change in between.
    pub fn toggle_auto_start(&self) {
        let enabled = !self.shared.lock().settings.auto_start;
        let result = if enabled {
            self.shared.auto_start.enable()
        } else {
            self.shared.auto_start.disable()
        };
        if let Err(e) = result {
            tracing::warn!(kind = e.kind(), enabled, "Autostart registration failed: {e}");
        }

        let mut state = self.shared.lock();
        state.settings.auto_start = enabled;
        self.shared.store.save_logged(&state.settings);
        self.shared.surface.show_auto_start(enabled);
    }

    /// Clean stop before the process exits.
    pub fn quit(&self) {
        tracing::info!("Quit requested");
        self.stop();
    }

    pub fn status(&self) -> ProbeStatus {
        self.shared.lock().status
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().probe_loop.is_some()
    }

    /// Copy of the in-memory settings.
    pub fn settings(&self) -> Settings {
        self.shared.lock().settings.clone()
    }

    fn spawn_loop(&self, interval: ProbeInterval) -> ProbeLoop {
        let cancel = CancellationToken::new();
        let task = self.shared.runtime.spawn(run_probe_loop(
            Arc::clone(&self.shared),
            interval.as_duration(),
            cancel.child_token(),
        ));
        ProbeLoop { cancel, task }
    }
}

impl<P: Probe> Drop for ProbeScheduler<P> {
    fn drop(&mut self) {
        if let Some(probe_loop) = self.shared.lock().probe_loop.take() {
            probe_loop.shutdown();
        }
    }
}

impl<P> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one probe result, unless the loop that produced it was cancelled.
    fn apply_outcome(&self, cancel: &CancellationToken, outcome: Result<u64, AppError>) {
        let mut state = self.lock();
        if cancel.is_cancelled() {
            tracing::debug!("Discarding probe result from a cancelled loop");
            return;
        }
        match outcome {
            Ok(cost) => {
                state.settings.total_bytes = state.settings.total_bytes.saturating_add(cost);
                self.store.save_logged(&state.settings);
                state.status = ProbeStatus::Probing;
                self.surface.show_status(state.status);
                self.surface.show_traffic(state.settings.total_bytes);
                tracing::debug!(cost, total_bytes = state.settings.total_bytes, "Probe succeeded");
            }
            Err(e) => {
                state.status = ProbeStatus::NoNetwork;
                self.surface.show_status(state.status);
                tracing::warn!(kind = e.kind(), "Probe failed: {e}");
            }
        }
    }
}

/// Tick every `period` (first tick one period after arming) until cancelled.
async fn run_probe_loop<P: Probe>(
    shared: Arc<Shared<P>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = shared.probe.probe() => outcome,
        };
        shared.apply_outcome(&cancel, outcome);
    }
    tracing::debug!(period_secs = period.as_secs(), "Probe loop exited");
}
