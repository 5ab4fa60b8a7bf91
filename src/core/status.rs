//! Observable probe status and its tray rendering.

use std::fmt;

/// Status line shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Stopped,
    Probing,
    NoNetwork,
}

/// Which tray icon to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Running,
    Stopped,
    NoNetwork,
}

impl ProbeStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProbeStatus::Stopped => "Status: Stopped",
            ProbeStatus::Probing => "Status: Probing",
            ProbeStatus::NoNetwork => "Status: No network",
        }
    }

    pub fn icon(self) -> IconState {
        match self {
            ProbeStatus::Stopped => IconState::Stopped,
            ProbeStatus::Probing => IconState::Running,
            ProbeStatus::NoNetwork => IconState::NoNetwork,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Byte counter line, in whole kilobytes.
pub fn format_traffic(total_bytes: u64) -> String {
    format!("Traffic: {} KB", total_bytes / 1024)
}
