//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Grabs text from a URL and commits it.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "curmit")]
#[command(version, about, long_about = None)]
pub struct Options {
    /// Enable verbose logging
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Launch the GUI
    #[arg(short, long)]
    pub gui: bool,

    /// If terminal mode, run forever
    #[arg(short, long)]
    pub daemon: bool,

    /// Do not create a log for downloads
    #[arg(short = 'q', long)]
    pub no_log: bool,

    /// Recommend a song
    #[arg(short, long, value_name = "PATH")]
    pub share: Option<PathBuf>,

    /// Display the incoming songs
    #[arg(short, long)]
    pub incoming: bool,

    /// Display the outgoing songs
    #[arg(short, long)]
    pub outgoing: bool,

    /// Filter to the specified usernames
    #[arg(short, long, value_name = "n", num_args = 0..)]
    pub users: Option<Vec<String>>,

    /// Create a new user
    #[arg(short = 'n', long = "new", value_name = "FirstLast")]
    pub new_user: Option<String>,

    /// Delete the current user
    #[arg(short = 'x', long)]
    pub delete: bool,

    /// Override the root sharing directory
    #[arg(long, value_name = "PATH", hide = true)]
    pub root: Option<PathBuf>,

    /// Run the program as a different user
    #[arg(long = "test", value_name = "FirstLast", hide = true)]
    pub test_user: Option<String>,
}
