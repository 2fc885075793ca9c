//! Command-line interface for the BlacknWhite terminal client.

use clap::Parser;
use std::path::PathBuf;

/// BlacknWhite - terminal client for the game server
#[derive(Parser, Debug)]
#[command(name = "blacknwhite_tui")]
#[command(about = "Play BlacknWhite against the server-hosted AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game server base URL
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Delay before each automatic AI move, in milliseconds
    #[arg(long, default_value = "500")]
    pub ai_delay_ms: u64,

    /// Log file path (the TUI owns the terminal, so logs go to a file)
    #[arg(long, default_value = "blacknwhite_tui.log")]
    pub log_file: PathBuf,
}
