//! Slick-RS library
//!
//! Command implementations and helpers behind the `slick-rs` binary.

pub mod cli;
pub mod commands;
pub mod utils;
