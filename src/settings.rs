//! Persistent per-user settings.
//!
//! The whole state is one small JSON document:
//!
//! ```json
//! { "interval_sec": 5, "total_bytes": 0, "auto_start": false, "is_running": false }
//! ```
//!
//! Loading never fails. A missing or unparseable file yields [`Settings::default`],
//! which is written back immediately. Saves go through a temp file and a rename
//! so a concurrent reader never sees a half-written document.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config;
use crate::error::AppError;

/// One of the supported probe periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub struct ProbeInterval(u32);

impl ProbeInterval {
    /// Every interval offered in the tray, shortest first.
    pub fn all() -> [ProbeInterval; 3] {
        config::INTERVAL_CHOICES_SECS.map(ProbeInterval)
    }

    /// Validate a period in seconds against the supported set.
    pub fn from_secs(secs: u32) -> Result<Self, AppError> {
        if config::INTERVAL_CHOICES_SECS.contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(AppError::InvalidInput(format!(
                "Unsupported probe interval: {secs}s (expected one of {:?})",
                config::INTERVAL_CHOICES_SECS
            )))
        }
    }

    pub fn secs(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for ProbeInterval {
    fn default() -> Self {
        Self(config::DEFAULT_INTERVAL_SECS)
    }
}

impl From<ProbeInterval> for u32 {
    fn from(interval: ProbeInterval) -> Self {
        interval.0
    }
}

impl fmt::Display for ProbeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} seconds", self.0)
    }
}

/// Unknown, non-positive or mistyped periods (`"10"`, `10.0`, `null`) fall
/// back to the default instead of discarding the rest of the file.
fn lenient_interval<'de, D>(deserializer: D) -> Result<ProbeInterval, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let interval = raw
        .as_u64()
        .and_then(|secs| u32::try_from(secs).ok())
        .and_then(|secs| ProbeInterval::from_secs(secs).ok());
    match interval {
        Some(interval) => Ok(interval),
        None => {
            let fallback = ProbeInterval::default();
            tracing::warn!(%raw, fallback = fallback.secs(), "Ignoring unsupported probe interval");
            Ok(fallback)
        }
    }
}

/// Persisted user state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "interval_sec", deserialize_with = "lenient_interval")]
    pub interval: ProbeInterval,
    /// Estimated bytes spent on successful probes, across restarts.
    pub total_bytes: u64,
    /// Mirrors the OS login-item registration.
    pub auto_start: bool,
    /// Whether probing was active at the last recorded state.
    pub is_running: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval: ProbeInterval::default(),
            total_bytes: 0,
            auto_start: false,
            is_running: false,
        }
    }
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.hotspot_keeper.json`, or the working directory when no home is known.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(config::SETTINGS_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted settings, falling back to (and writing) defaults.
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok((settings, normalized)) => {
                if normalized {
                    tracing::info!("Settings normalized, rewriting {}", self.path.display());
                    self.save_logged(&settings);
                }
                settings
            }
            Err(e) => {
                match &e {
                    LoadError::Missing => {
                        tracing::info!("No settings at {}, writing defaults", self.path.display())
                    }
                    LoadError::Invalid(err) => tracing::warn!(
                        kind = err.kind(),
                        "Unreadable settings at {}: {err}. Using defaults.",
                        self.path.display()
                    ),
                }
                let settings = Settings::default();
                self.save_logged(&settings);
                settings
            }
        }
    }

    /// Returns the parsed settings and whether they differ from the file content
    /// (missing fields filled in, unsupported interval replaced).
    fn try_load(&self) -> Result<(Settings, bool), LoadError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(LoadError::Missing),
            Err(e) => return Err(LoadError::Invalid(e.into())),
        };
        let raw: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| LoadError::Invalid(e.into()))?;
        let settings: Settings =
            serde_json::from_value(raw.clone()).map_err(|e| LoadError::Invalid(e.into()))?;
        let normalized = serde_json::to_value(&settings)
            .map(|value| value != raw)
            .unwrap_or(false);
        Ok((settings, normalized))
    }

    /// Write the full document atomically (temp file + rename).
    pub fn save(&self, settings: &Settings) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, content)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(AppError::Settings(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// [`save`](Self::save), logging instead of returning the failure.
    pub fn save_logged(&self, settings: &Settings) {
        if let Err(e) = self.save(settings) {
            tracing::warn!(kind = e.kind(), "Failed to persist settings: {e}");
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

enum LoadError {
    Missing,
    Invalid(AppError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join(config::SETTINGS_FILE_NAME))
    }

    fn read_json(store: &SettingsStore) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_interval_accepts_menu_choices_only() {
        for secs in [5, 10, 30] {
            assert_eq!(ProbeInterval::from_secs(secs).unwrap().secs(), secs);
        }
        for secs in [0, 1, 15, 60] {
            assert_eq!(
                ProbeInterval::from_secs(secs).unwrap_err().kind(),
                "InvalidInput"
            );
        }
    }

    #[test]
    fn test_interval_all_matches_choices() {
        let secs: Vec<u32> = ProbeInterval::all().iter().map(|i| i.secs()).collect();
        assert_eq!(secs, vec![5, 10, 30]);
        assert_eq!(ProbeInterval::all()[2].as_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_yields_defaults_and_writes_them() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let settings = store.load();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            read_json(&store),
            serde_json::json!({
                "interval_sec": 5,
                "total_bytes": 0,
                "auto_start": false,
                "is_running": false,
            })
        );
    }

    #[test]
    fn test_corrupt_file_is_replaced_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{\"interval_sec\": 10, \"total_").unwrap();

        assert_eq!(store.load(), Settings::default());
        assert_eq!(read_json(&store)["interval_sec"], 5);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let settings = Settings {
            interval: ProbeInterval::from_secs(30).unwrap(),
            total_bytes: 123_456_789,
            auto_start: true,
            is_running: true,
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_unsupported_interval_is_normalized_and_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"interval_sec": 0, "total_bytes": 1400, "auto_start": true, "is_running": false}"#,
        )
        .unwrap();

        let settings = store.load();
        assert_eq!(settings.interval, ProbeInterval::default());
        assert_eq!(settings.total_bytes, 1400);
        assert!(settings.auto_start);
        assert_eq!(read_json(&store)["interval_sec"], 5);
    }

    #[test]
    fn test_mistyped_interval_keeps_the_other_fields() {
        for raw in [r#""10""#, "10.0", "null"] {
            let dir = tempfile::tempdir().unwrap();
            let store = store_in(&dir);
            std::fs::write(
                store.path(),
                format!(
                    r#"{{"interval_sec": {raw}, "total_bytes": 7000, "auto_start": true, "is_running": true}}"#
                ),
            )
            .unwrap();

            let settings = store.load();
            assert_eq!(
                settings,
                Settings {
                    interval: ProbeInterval::default(),
                    total_bytes: 7000,
                    auto_start: true,
                    is_running: true,
                },
                "interval_sec = {raw}"
            );
            let written = read_json(&store);
            assert_eq!(written["interval_sec"], 5, "interval_sec = {raw}");
            assert_eq!(written["total_bytes"], 7000, "interval_sec = {raw}");
        }
    }

    #[test]
    fn test_file_without_running_flag_gets_it_filled_in() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"interval_sec": 10, "total_bytes": 700, "auto_start": false}"#,
        )
        .unwrap();

        let settings = store.load();
        assert_eq!(settings.interval.secs(), 10);
        assert!(!settings.is_running);
        assert_eq!(read_json(&store)["is_running"], false);
    }

    #[test]
    fn test_save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("state.json"));
        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_default_path_uses_settings_file_name() {
        assert!(SettingsStore::default_path().ends_with(config::SETTINGS_FILE_NAME));
    }
}
