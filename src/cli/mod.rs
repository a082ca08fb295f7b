//! # Command-Line Interface
//!
//! The interactive menu behind the `imagecypher` binary.

pub mod menu;

pub use menu::{run_menu, MenuOutcome};
