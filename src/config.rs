//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::state::Settings;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "timer-deck")]
#[command(about = "A state-managed HTTP server for category-grouped countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON file holding timers, history and preferences
    #[arg(short, long, default_value = "timer-deck.json")]
    pub data_file: PathBuf,

    /// Keep everything in memory instead of the data file
    #[arg(long)]
    pub in_memory: bool,

    /// Program run with each alert message as its last argument
    /// (e.g. "notify-send"); alerts are only logged when unset
    #[arg(short, long)]
    pub notify_command: Option<String>,

    /// Height of one timer row, used to size expanding categories
    #[arg(long, default_value = "72")]
    pub row_height: f64,

    /// Start empty instead of with the example timer when no data is stored
    #[arg(long)]
    pub no_example: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Container settings derived from the arguments
    pub fn settings(&self) -> Settings {
        Settings {
            port: self.port,
            host: self.host.clone(),
            seed_example: !self.no_example,
            row_height: self.row_height,
        }
    }
}
