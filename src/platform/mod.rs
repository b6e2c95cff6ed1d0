//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes to logical directions)
//! - Time/ticks (frame delta from host timestamps)

pub mod input;
pub mod time;

pub use input::{direction_for_key, direction_for_key_code};
pub use time::FrameClock;
