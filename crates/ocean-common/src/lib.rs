//! Common types and utilities shared across all ocean-track crates.

pub mod error;
pub mod mission;
pub mod window;

pub use error::{OceanError, OceanResult};
pub use mission::{is_known_mission, DEFAULT_MISSIONS};
pub use window::TimeWindow;
