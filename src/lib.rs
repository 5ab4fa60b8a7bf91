pub mod autostart;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod probe;
pub mod services;
pub mod settings;
#[cfg(feature = "tray")]
mod tray;

fn init_logging() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in Hotspot Keeper: {info}");
        default_hook(info);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotspot_keeper=info,hotspot_keeper_lib=info".into()),
        )
        .init();
}

/// Tray build: Tauri owns the main thread and the async runtime.
#[cfg(feature = "tray")]
pub fn run() {
    init_logging();

    tauri::Builder::default()
        .setup(|app| {
            tray::setup(app)?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Headless build: log-only surface, probing starts immediately, Ctrl-C quits.
#[cfg(not(feature = "tray"))]
pub fn run() {
    init_logging();

    if let Err(e) = run_headless() {
        tracing::error!("Hotspot Keeper exited with error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tray"))]
fn run_headless() -> anyhow::Result<()> {
    use std::sync::Arc;

    use crate::commands::{command_channel, Command};
    use crate::core::LogSurface;
    use crate::probe::HttpProbe;
    use crate::services::BackgroundServices;
    use crate::settings::SettingsStore;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let (sender, commands) = command_channel();
        let services = BackgroundServices {
            store: SettingsStore::new(SettingsStore::default_path()),
            probe: HttpProbe::new()?,
            surface: Arc::new(LogSurface),
            auto_start: autostart::platform_auto_start(),
        };

        sender.send(Command::Start);
        let quit_sender = sender.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                quit_sender.send(Command::Quit);
            }
        });

        let exit = services.run(commands).await;
        drop(sender);
        tracing::info!(?exit, "Hotspot Keeper stopped");
        Ok(())
    })
}
