//! Unified error type for Hotspot Keeper.
//!
//! `AppError` is the single error type returned by the settings store, the
//! probe, and the autostart backends. None of these failures are fatal: the
//! scheduler logs them with `kind` as a structured field and carries on.

/// Application-level error.
///
/// Each variant maps to a distinct failure domain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings file could not be read, parsed, or written.
    #[error("{0}")]
    Settings(String),

    /// Reachability check or probe request failed.
    #[error("{0}")]
    Probe(String),

    /// OS autostart registration failed.
    #[error("{0}")]
    AutoStart(String),

    /// I/O and OS-level errors (filesystem, process spawning).
    #[error("{0}")]
    Io(String),

    /// Invalid or missing user input.
    #[error("{0}")]
    InvalidInput(String),
}

impl AppError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Settings(_) => "Settings",
            AppError::Probe(_) => "Probe",
            AppError::AutoStart(_) => "AutoStart",
            AppError::Io(_) => "Io",
            AppError::InvalidInput(_) => "InvalidInput",
        }
    }
}

// ---- From implementations for ergonomic error conversion ----

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Settings(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Probe(err.to_string())
    }
}
