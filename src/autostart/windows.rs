//! Windows autostart via the per-user `Run` registry key.
//!
//! Uses `reg.exe` so no registry bindings are needed.

use std::process::Command;

use crate::error::AppError;

use super::{current_exe_string, AutoStart};

const RUN_KEY: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Run";

pub struct RegistryRunKey {
    value_name: String,
}

impl RegistryRunKey {
    pub fn new(value_name: impl Into<String>) -> Self {
        Self {
            value_name: value_name.into(),
        }
    }
}

impl AutoStart for RegistryRunKey {
    fn enable(&self) -> Result<(), AppError> {
        let exe = current_exe_string()?;
        let output = Command::new("reg")
            .args([
                "add",
                RUN_KEY,
                "/v",
                &self.value_name,
                "/t",
                "REG_SZ",
                "/d",
                &exe,
                "/f",
            ])
            .output()
            .map_err(|e| AppError::AutoStart(e.to_string()))?;
        if !output.status.success() {
            return Err(AppError::AutoStart("Failed to add registry entry".into()));
        }
        tracing::info!("Auto-start enabled: {exe}");
        Ok(())
    }

    fn disable(&self) -> Result<(), AppError> {
        // Deleting a missing value fails; that already means "disabled".
        let _ = Command::new("reg")
            .args(["delete", RUN_KEY, "/v", &self.value_name, "/f"])
            .output();
        tracing::info!("Auto-start disabled");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        let output = Command::new("reg")
            .args(["query", RUN_KEY, "/v", &self.value_name])
            .output();
        matches!(output, Ok(o) if o.status.success())
    }
}
