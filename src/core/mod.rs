//! Core logic: probe scheduling, status, and the output surface.
//!
//! - [`ProbeScheduler`]: start/stop/re-arm state machine around one probe loop
//! - [`ProbeStatus`] / [`IconState`]: what the user sees
//! - [`ControlSurface`]: sink for status, counter, and menu-state updates

pub mod scheduler;
pub mod status;
pub mod surface;

pub use scheduler::ProbeScheduler;
pub use status::{format_traffic, IconState, ProbeStatus};
pub use surface::{ControlSurface, LogSurface};
