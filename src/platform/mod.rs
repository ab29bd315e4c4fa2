//! Platform abstraction layer
//!
//! Narrow seams to the windowing system:
//! - Key state from press/release events
//! - Frame time

pub mod input;
pub mod time;

pub use input::{Key, KeyEvent, KeyboardState};
pub use time::{Clock, ManualClock, SystemClock};
