//! Grab text from a URL and commit it.
//!
//! The binary parses its flags into [`Options`], builds a [`logging::Logger`]
//! from the verbosity count and hands control to a [`Runner`]. The default
//! runner, [`Curmit`], is the extension point for the fetch-and-commit logic.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod interrupt;
pub mod logging;
pub mod runner;
pub mod util;

pub use cli::{dispatch, dispatch_with_writer, Options};
pub use errors::{RunError, RunResult, SettingsError};
pub use runner::{Curmit, Runner};
