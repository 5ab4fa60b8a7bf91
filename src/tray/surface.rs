//! [`ControlSurface`] backed by the Tauri tray menu.
//!
//! Menu and tray handles must be touched on the main thread. Every update is
//! queued with `run_on_main_thread` so the scheduler never waits on rendering.

use tauri::menu::{CheckMenuItem, MenuItem};
use tauri::AppHandle;

use crate::core::{format_traffic, ControlSurface, ProbeStatus};
use crate::settings::ProbeInterval;

use super::{icons, TRAY_ID};

/// Handles of the menu items the core updates.
#[derive(Clone)]
pub struct TrayItems {
    pub status: MenuItem<tauri::Wry>,
    pub traffic: MenuItem<tauri::Wry>,
    pub start: MenuItem<tauri::Wry>,
    pub stop: MenuItem<tauri::Wry>,
    pub intervals: Vec<(ProbeInterval, CheckMenuItem<tauri::Wry>)>,
    pub auto_start: CheckMenuItem<tauri::Wry>,
}

pub struct TraySurface {
    app: AppHandle,
    items: TrayItems,
}

impl TraySurface {
    pub fn new(app: AppHandle, items: TrayItems) -> Self {
        Self { app, items }
    }

    fn on_main_thread<F>(&self, update: F)
    where
        F: FnOnce() -> tauri::Result<()> + Send + 'static,
    {
        let queued = self.app.run_on_main_thread(move || {
            if let Err(e) = update() {
                tracing::warn!("Tray update failed: {e}");
            }
        });
        if let Err(e) = queued {
            tracing::warn!("Tray update dropped: {e}");
        }
    }
}

impl ControlSurface for TraySurface {
    fn show_status(&self, status: ProbeStatus) {
        let app = self.app.clone();
        let item = self.items.status.clone();
        self.on_main_thread(move || {
            item.set_text(status.label())?;
            if let Some(tray) = app.tray_by_id(TRAY_ID) {
                tray.set_icon(Some(icons::icon(status.icon())))?;
                tray.set_tooltip(Some(format!("Hotspot Keeper\n{status}")))?;
            }
            Ok(())
        });
    }

    fn show_traffic(&self, total_bytes: u64) {
        let item = self.items.traffic.clone();
        self.on_main_thread(move || item.set_text(format_traffic(total_bytes)));
    }

    fn show_running(&self, running: bool) {
        let start = self.items.start.clone();
        let stop = self.items.stop.clone();
        self.on_main_thread(move || {
            start.set_enabled(!running)?;
            stop.set_enabled(running)
        });
    }

    fn show_interval(&self, interval: ProbeInterval) {
        let items = self.items.intervals.clone();
        self.on_main_thread(move || {
            for (choice, item) in &items {
                item.set_checked(*choice == interval)?;
            }
            Ok(())
        });
    }

    fn show_auto_start(&self, enabled: bool) {
        let item = self.items.auto_start.clone();
        self.on_main_thread(move || item.set_checked(enabled));
    }
}
