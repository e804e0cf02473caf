//! Root CLI structure for slick-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slick-rs")]
#[command(about = "Command-line tools for slick-particles effects", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Particle system operations
    System {
        #[command(subcommand)]
        command: crate::commands::system::SystemCommands,
    },

    /// Single emitter operations
    Emitter {
        #[command(subcommand)]
        command: crate::commands::emitter::EmitterCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
