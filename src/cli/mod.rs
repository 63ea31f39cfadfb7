//! CLI layer: argument parsing and dispatch

pub mod args;
pub mod dispatch;
pub mod output;

pub use args::Options;
pub use dispatch::{dispatch, dispatch_with_writer};
