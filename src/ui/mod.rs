//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - View rendering dispatch, header and notice overlay
//! - `helpers` - Command spawning and link opening
//! - `articles` - Article list and detail pane
//! - `saved` - Saved-articles browser
//! - `status` - Status bar widget

mod articles;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod saved;
mod status;

pub use loop_runner::{run, Action};
