//! Run-at-login registration.
//!
//! Each platform gets its own backend behind [`AutoStart`]:
//! - Windows: `HKCU\...\Run` value (`windows`)
//! - macOS: LaunchAgent plist in `~/Library/LaunchAgents`
//! - Linux: XDG autostart `.desktop` entry in `~/.config/autostart`
//!
//! All operations are idempotent; enabling twice or disabling an absent entry
//! succeeds.

#[cfg(target_os = "windows")]
mod windows;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config;
use crate::error::AppError;

/// OS capability that launches the current executable at user login.
pub trait AutoStart: Send + Sync {
    fn enable(&self) -> Result<(), AppError>;
    fn disable(&self) -> Result<(), AppError>;
    /// Best-effort query of the OS registration.
    fn is_enabled(&self) -> bool;
}

/// Select the backend for the platform this binary was built for.
pub fn platform_auto_start() -> Arc<dyn AutoStart> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::RegistryRunKey::new(config::AUTOSTART_ENTRY_NAME))
    }
    #[cfg(target_os = "macos")]
    {
        match dirs::home_dir() {
            Some(home) => Arc::new(LoginFile::launch_agent(&home)),
            None => Arc::new(Unsupported),
        }
    }
    #[cfg(target_os = "linux")]
    {
        match dirs::config_dir() {
            Some(dir) => Arc::new(LoginFile::xdg_desktop_entry(&dir)),
            None => Arc::new(Unsupported),
        }
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        Arc::new(Unsupported)
    }
}

fn current_exe_string() -> Result<String, AppError> {
    let exe = std::env::current_exe().map_err(|e| AppError::AutoStart(e.to_string()))?;
    Ok(exe.to_string_lossy().to_string())
}

/// Which login-item file format to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginFileKind {
    LaunchAgent,
    DesktopEntry,
}

/// Autostart backed by a single file whose presence means "enabled".
#[derive(Debug, Clone)]
pub struct LoginFile {
    path: PathBuf,
    kind: LoginFileKind,
}

impl LoginFile {
    /// `<home>/Library/LaunchAgents/com.hotspot.keeper.plist`
    pub fn launch_agent(home: &Path) -> Self {
        Self {
            path: home
                .join("Library")
                .join("LaunchAgents")
                .join(format!("{}.plist", config::AUTOSTART_AGENT_LABEL)),
            kind: LoginFileKind::LaunchAgent,
        }
    }

    /// `<config_dir>/autostart/hotspot-keeper.desktop`
    pub fn xdg_desktop_entry(config_dir: &Path) -> Self {
        Self {
            path: config_dir
                .join("autostart")
                .join(config::AUTOSTART_DESKTOP_FILE),
            kind: LoginFileKind::DesktopEntry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, exe: &str) -> String {
        match self.kind {
            LoginFileKind::LaunchAgent => render_launch_agent(exe),
            LoginFileKind::DesktopEntry => render_desktop_entry(exe),
        }
    }
}

impl AutoStart for LoginFile {
    fn enable(&self) -> Result<(), AppError> {
        let exe = current_exe_string()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::AutoStart(e.to_string()))?;
        }
        std::fs::write(&self.path, self.render(&exe))
            .map_err(|e| AppError::AutoStart(e.to_string()))?;
        tracing::info!("Auto-start enabled: {}", self.path.display());
        Ok(())
    }

    fn disable(&self) -> Result<(), AppError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Auto-start disabled");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::AutoStart(e.to_string())),
        }
    }

    fn is_enabled(&self) -> bool {
        self.path.exists()
    }
}

/// Backend for platforms without a supported login-item mechanism.
#[derive(Debug, Default)]
pub struct Unsupported;

impl AutoStart for Unsupported {
    fn enable(&self) -> Result<(), AppError> {
        Err(AppError::AutoStart(
            "Auto-start is not supported on this platform".into(),
        ))
    }

    fn disable(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

fn render_launch_agent(exe: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Label</key><string>{label}</string>
	<key>ProgramArguments</key>
	<array><string>{exe}</string></array>
	<key>RunAtLoad</key><true/>
	<key>KeepAlive</key><false/>
</dict>
</plist>
"#,
        label = config::AUTOSTART_AGENT_LABEL,
        exe = xml_escape(exe),
    )
}

fn render_desktop_entry(exe: &str) -> String {
    format!(
        "[Desktop Entry]\nType=Application\nName=Hotspot Keeper\nExec=\"{exe}\"\nX-GNOME-Autostart-enabled=true\nNoDisplay=true\n"
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
