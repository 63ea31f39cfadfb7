//! Process exit codes

/// Successful termination, also used when the user cancels a run
pub const OK: i32 = 0;

/// The run routine reported failure or returned an error
pub const FAILURE: i32 = 1;

/// Command line usage error (matches clap's own exit code)
pub const USAGE: i32 = 2;

/// Forced exit on a second Ctrl-C (128 + SIGINT)
pub const INTERRUPTED: i32 = 130;
