//! Tauri tray shell: menu construction and wiring into the command queue.
//!
//! The shell owns no state. Clicks become [`Command`](crate::commands::Command)s
//! pushed into the bounded queue; the scheduler renders back through
//! [`TraySurface`].

mod icons;
mod surface;

use std::sync::Arc;

use tauri::menu::{CheckMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu};
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Wry};

use crate::autostart::platform_auto_start;
use crate::commands::logic::{
    MENU_AUTOSTART, MENU_INTERVALS, MENU_QUIT, MENU_START, MENU_STATUS, MENU_STOP, MENU_TRAFFIC,
};
use crate::commands::{command_channel, interval_menu_id, parse_menu_id, LoopExit};
use crate::core::{format_traffic, IconState, ProbeStatus};
use crate::probe::HttpProbe;
use crate::services::BackgroundServices;
use crate::settings::{ProbeInterval, SettingsStore};

use surface::{TrayItems, TraySurface};

pub const TRAY_ID: &str = "main";

/// Build the tray and start the background services on Tauri's runtime.
pub fn setup(app: &mut tauri::App) -> anyhow::Result<()> {
    let handle = app.handle().clone();
    let (sender, commands) = command_channel();
    let (menu, items) = build_tray_menu(&handle)?;

    let _tray = TrayIconBuilder::with_id(TRAY_ID)
        .icon(icons::icon(IconState::Stopped))
        .tooltip("Hotspot Keeper")
        .menu(&menu)
        .show_menu_on_left_click(true)
        .on_menu_event(move |_app, event| match parse_menu_id(event.id().as_ref()) {
            Ok(command) => {
                sender.send(command);
            }
            Err(e) => tracing::debug!("Ignoring menu event: {e}"),
        })
        .build(app)?;

    let services = BackgroundServices {
        store: SettingsStore::new(SettingsStore::default_path()),
        probe: HttpProbe::new()?,
        surface: Arc::new(TraySurface::new(handle.clone(), items)),
        auto_start: platform_auto_start(),
    };
    tauri::async_runtime::spawn(async move {
        if services.run(commands).await == LoopExit::Quit {
            handle.exit(0);
        }
    });

    tracing::info!("Tray ready");
    Ok(())
}

/// Build the tray menu. Returns the menu and the handles the core updates.
fn build_tray_menu(app: &AppHandle) -> anyhow::Result<(Menu<Wry>, TrayItems)> {
    let status = MenuItem::with_id(
        app,
        MENU_STATUS,
        ProbeStatus::Stopped.label(),
        false,
        None::<&str>,
    )?;

    let intervals = ProbeInterval::all()
        .into_iter()
        .map(|interval| {
            CheckMenuItem::with_id(
                app,
                interval_menu_id(interval),
                interval.to_string(),
                true,
                false,
                None::<&str>,
            )
            .map(|item| (interval, item))
        })
        .collect::<tauri::Result<Vec<_>>>()?;
    let interval_refs: Vec<&dyn IsMenuItem<Wry>> = intervals
        .iter()
        .map(|(_, item)| item as &dyn IsMenuItem<Wry>)
        .collect();
    let interval_menu =
        Submenu::with_id_and_items(app, MENU_INTERVALS, "Probe interval", true, &interval_refs)?;

    let start = MenuItem::with_id(app, MENU_START, "Start probing", true, None::<&str>)?;
    let stop = MenuItem::with_id(app, MENU_STOP, "Stop probing", false, None::<&str>)?;
    let auto_start =
        CheckMenuItem::with_id(app, MENU_AUTOSTART, "Start at login", true, false, None::<&str>)?;
    let traffic = MenuItem::with_id(app, MENU_TRAFFIC, format_traffic(0), false, None::<&str>)?;
    let quit = MenuItem::with_id(app, MENU_QUIT, "Quit", true, None::<&str>)?;

    let menu = Menu::with_items(
        app,
        &[
            &status,
            &PredefinedMenuItem::separator(app)?,
            &interval_menu,
            &PredefinedMenuItem::separator(app)?,
            &start,
            &stop,
            &auto_start,
            &PredefinedMenuItem::separator(app)?,
            &traffic,
            &PredefinedMenuItem::separator(app)?,
            &quit,
        ],
    )?;

    let items = TrayItems {
        status,
        traffic,
        start,
        stop,
        intervals,
        auto_start,
    };
    Ok((menu, items))
}
