//! Event handling for Stakemate.
//!
//! This module maps terminal input to store actions, aware of the current
//! view and input mode.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::InputEvent;
