//! Event handler system.
//!
//! - `activity` - runs for every message (anti-spam gate, message log)
//! - `reactions` - reaction-to-save

pub mod activity;
pub mod reactions;

pub use activity::track_activity;
pub use reactions::reaction_handler;
