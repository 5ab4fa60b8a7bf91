//! Pure mapping between tray menu item ids and [`Command`]s.
//!
//! These functions take plain parameters (no tray handle) and can be
//! unit-tested without a Tauri runtime.

use crate::error::AppError;
use crate::settings::ProbeInterval;

use super::Command;

// Display-only items; clicks on them never become commands.
#[cfg(any(feature = "tray", test))]
pub const MENU_STATUS: &str = "status";
#[cfg(any(feature = "tray", test))]
pub const MENU_TRAFFIC: &str = "traffic";
#[cfg(any(feature = "tray", test))]
pub const MENU_INTERVALS: &str = "intervals";
pub const MENU_START: &str = "start";
pub const MENU_STOP: &str = "stop";
pub const MENU_AUTOSTART: &str = "autostart";
pub const MENU_QUIT: &str = "quit";

const INTERVAL_PREFIX: &str = "interval_";

/// Menu id of the check item for `interval`, e.g. `interval_10`.
pub fn interval_menu_id(interval: ProbeInterval) -> String {
    format!("{INTERVAL_PREFIX}{}", interval.secs())
}

/// Translate a clicked menu id into a command.
pub fn parse_menu_id(id: &str) -> Result<Command, AppError> {
    match id {
        MENU_START => Ok(Command::Start),
        MENU_STOP => Ok(Command::Stop),
        MENU_AUTOSTART => Ok(Command::ToggleAutoStart),
        MENU_QUIT => Ok(Command::Quit),
        other => {
            let secs = other
                .strip_prefix(INTERVAL_PREFIX)
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown menu item: {other}")))?;
            Ok(Command::SetInterval(ProbeInterval::from_secs(secs)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_ids_round_trip_for_all_choices() {
        for interval in ProbeInterval::all() {
            let id = interval_menu_id(interval);
            assert_eq!(parse_menu_id(&id).unwrap(), Command::SetInterval(interval));
        }
    }

    #[test]
    fn test_parse_fixed_items() {
        assert_eq!(parse_menu_id("start").unwrap(), Command::Start);
        assert_eq!(parse_menu_id("stop").unwrap(), Command::Stop);
        assert_eq!(parse_menu_id("autostart").unwrap(), Command::ToggleAutoStart);
        assert_eq!(parse_menu_id("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_display_only_items_are_not_commands() {
        assert_eq!(parse_menu_id(MENU_STATUS).unwrap_err().kind(), "InvalidInput");
        assert_eq!(parse_menu_id(MENU_TRAFFIC).unwrap_err().kind(), "InvalidInput");
    }

    #[test]
    fn test_unsupported_interval_is_rejected() {
        assert_eq!(parse_menu_id("interval_15").unwrap_err().kind(), "InvalidInput");
        assert_eq!(parse_menu_id("interval_x").unwrap_err().kind(), "InvalidInput");
    }
}
