//! Shared utilities for the slick-rs CLI

pub mod format;
pub mod headless;
pub mod progress;
pub mod table;

pub use format::*;
pub use headless::*;
pub use progress::*;
pub use table::*;
