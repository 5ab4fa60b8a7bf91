//! Output side of the control surface.
//!
//! The scheduler pushes every visible change through [`ControlSurface`]. All
//! methods are fire-and-forget: implementations must not block on rendering.

use crate::core::status::{format_traffic, ProbeStatus};
use crate::settings::ProbeInterval;

pub trait ControlSurface: Send + Sync {
    /// Status line and tray icon.
    fn show_status(&self, status: ProbeStatus);

    /// Byte counter line.
    fn show_traffic(&self, total_bytes: u64);

    /// Enable exactly one of Start/Stop.
    fn show_running(&self, running: bool);

    /// Check the selected interval, uncheck the others.
    fn show_interval(&self, interval: ProbeInterval);

    /// Check or uncheck the "Start at login" item.
    fn show_auto_start(&self, enabled: bool);
}

/// Headless surface that writes every change to the log.
#[derive(Debug, Default)]
pub struct LogSurface;

impl ControlSurface for LogSurface {
    fn show_status(&self, status: ProbeStatus) {
        tracing::info!(icon = ?status.icon(), "{status}");
    }

    fn show_traffic(&self, total_bytes: u64) {
        tracing::info!(total_bytes, "{}", format_traffic(total_bytes));
    }

    fn show_running(&self, running: bool) {
        tracing::debug!(running, "Start/stop toggled");
    }

    fn show_interval(&self, interval: ProbeInterval) {
        tracing::info!("Probe interval: {interval}");
    }

    fn show_auto_start(&self, enabled: bool) {
        tracing::info!(enabled, "Autostart");
    }
}
