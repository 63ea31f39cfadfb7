//! Parse, configure logging, run, and map the outcome to an exit code

use std::env;
use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::fmt::MakeWriter;

use crate::cli::output;
use crate::cli::Options;
use crate::errors::{RunError, RunResult};
use crate::exitcode;
use crate::logging::Logger;
use crate::runner::Runner;

/// Run one invocation with logging sent to stderr.
///
/// `args` includes the program name, as with [`std::env::args_os`].
pub fn dispatch<I, T>(args: I, runner: &dyn Runner) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match parse(args) {
        Ok(options) => {
            let logger = Logger::configure(options.verbose);
            logger.in_scope(|| execute(&options, runner))
        }
        Err(code) => code,
    }
}

/// Like [`dispatch`], with log records sent to `make_writer`.
pub fn dispatch_with_writer<I, T, W>(args: I, runner: &dyn Runner, make_writer: W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match parse(args) {
        Ok(options) => {
            let logger = Logger::with_writer(options.verbose, make_writer);
            logger.in_scope(|| execute(&options, runner))
        }
        Err(code) => code,
    }
}

/// Parse `args`, printing clap's message and returning its exit code on failure.
fn parse<I, T>(args: I) -> Result<Options, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Options::try_parse_from(args).map_err(|e| {
        // --help and --version end up here too, with exit code 0
        let _ = e.print();
        e.exit_code()
    })
}

fn execute(options: &Options, runner: &dyn Runner) -> i32 {
    match run(options, runner) {
        Ok(true) => {
            debug!("command succeeded");
            exitcode::OK
        }
        Ok(false) => {
            debug!("command failed");
            exitcode::FAILURE
        }
        Err(RunError::Interrupted) => {
            debug!("command cancelled");
            exitcode::OK
        }
        Err(RunError::Usage(message)) => {
            let _ = Options::command()
                .error(ErrorKind::ValueValidation, message)
                .print();
            exitcode::USAGE
        }
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    }
}

fn run(options: &Options, runner: &dyn Runner) -> RunResult<bool> {
    let cwd = env::current_dir().map_err(|e| RunError::io("current directory", e))?;
    runner.run(options, &cwd)
}
