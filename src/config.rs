//! Centralized runtime constants for Hotspot Keeper.
//!
//! All probe targets, timeouts, and file names are collected here so they can
//! be found and adjusted in a single place rather than scattered across modules.

/// Estimated wire cost of one HEAD request/response pair (bytes).
/// Flat estimate, never measured, so the counter stays reproducible.
pub const PROBE_COST_BYTES: u64 = 700;

/// Low-level connect target used only to sense reachability (public DNS, TCP/53).
pub const REACHABILITY_TARGET: &str = "8.8.8.8:53";

/// Upper bound for the reachability pre-check (seconds).
pub const REACHABILITY_TIMEOUT_SECS: u64 = 2;

/// Endpoint answering with an empty 204 response.
pub const PROBE_URL: &str = "https://www.gstatic.com/generate_204";

/// Upper bound for the HEAD request (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Probe intervals offered in the tray menu (seconds).
pub const INTERVAL_CHOICES_SECS: [u32; 3] = [5, 10, 30];

/// Interval used on first launch and when a persisted value is unusable (seconds).
pub const DEFAULT_INTERVAL_SECS: u32 = 5;

/// Capacity of the bounded queue between the tray and the command loop.
pub const COMMAND_QUEUE_CAPACITY: usize = 32;

/// Settings file name, placed in the user's home directory.
pub const SETTINGS_FILE_NAME: &str = ".hotspot_keeper.json";

/// Value name under the Windows `Run` key.
pub const AUTOSTART_ENTRY_NAME: &str = "HotspotKeeper";

/// launchd label for the macOS LaunchAgent.
pub const AUTOSTART_AGENT_LABEL: &str = "com.hotspot.keeper";

/// File name of the XDG autostart entry on Linux.
pub const AUTOSTART_DESKTOP_FILE: &str = "hotspot-keeper.desktop";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_is_a_menu_choice() {
        assert!(INTERVAL_CHOICES_SECS.contains(&DEFAULT_INTERVAL_SECS));
    }

    #[test]
    fn test_reachability_check_is_shorter_than_request() {
        const _: () = assert!(REACHABILITY_TIMEOUT_SECS < REQUEST_TIMEOUT_SECS);
    }

    /// Compile-time sanity: all constants are positive.
    #[test]
    fn test_all_constants_positive() {
        const _: () = assert!(PROBE_COST_BYTES > 0);
        const _: () = assert!(REACHABILITY_TIMEOUT_SECS > 0);
        const _: () = assert!(REQUEST_TIMEOUT_SECS > 0);
        const _: () = assert!(DEFAULT_INTERVAL_SECS > 0);
        const _: () = assert!(COMMAND_QUEUE_CAPACITY > 0);
        for secs in INTERVAL_CHOICES_SECS {
            assert!(secs > 0);
        }
    }

    #[test]
    fn test_reachability_target_parses_as_socket_addr() {
        let addr: std::net::SocketAddr = REACHABILITY_TARGET.parse().unwrap();
        assert_eq!(addr.port(), 53);
    }
}
