use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// carewatch: realtime clinical notification aggregator
///
/// Watches emergency, vital-sign and appointment change feeds and turns the
/// alert-worthy events into a bounded, newest-first notification log.
#[derive(Parser, Debug)]
#[command(name = "carewatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Patients JSON file, overrides the configured directory
    #[arg(short, long, global = true)]
    pub patients: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a session over a JSON-lines event file and print the final log
    #[command(alias = "r")]
    Replay {
        /// Event file, or `-` for stdin
        file: PathBuf,

        /// Output the log as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read events from stdin as a signed-in user until EOF or Ctrl+C
    #[command(alias = "l")]
    Listen {
        /// User to sign in as
        #[arg(short, long, default_value = "clinician")]
        user: String,
    },

    /// Classify a single event JSON document
    #[command(alias = "c")]
    Classify {
        /// Event file
        file: PathBuf,
    },
}
