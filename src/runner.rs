//! The run routine invoked after argument parsing and logging setup

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::cli::Options;
use crate::config::Settings;
use crate::errors::RunResult;
use crate::interrupt::Interrupt;

/// Work performed for one invocation.
///
/// `Ok(true)` is success, `Ok(false)` is failure (exit code 1) and
/// `Err(RunError::Interrupted)` is a user cancellation (exit code 0).
///
/// The first Ctrl-C only sets a flag. Runners that do long work must poll
/// [`Interrupt::check`] between steps; a second Ctrl-C exits the process.
pub trait Runner {
    fn run(&self, options: &Options, cwd: &Path) -> RunResult<bool>;
}

impl<F> Runner for F
where
    F: Fn(&Options, &Path) -> RunResult<bool>,
{
    fn run(&self, options: &Options, cwd: &Path) -> RunResult<bool> {
        self(options, cwd)
    }
}

/// The default runner.
///
/// Fetching text from a URL and committing it is not implemented yet: after
/// resolving its settings the runner reports failure.
#[derive(Debug, Clone)]
pub struct Curmit {
    interrupt: Interrupt,
    config_path: Option<PathBuf>,
}

impl Curmit {
    pub fn new(interrupt: Interrupt) -> Self {
        Self {
            interrupt,
            config_path: None,
        }
    }

    /// Read settings from `path` instead of the global config file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn settings(&self, options: &Options) -> RunResult<Settings> {
        let settings = match &self.config_path {
            Some(path) => Settings::load_from(Some(path.as_path()))?,
            None => Settings::load()?,
        };
        Ok(settings.with_options(options))
    }
}

impl Runner for Curmit {
    #[instrument(level = "debug", skip(self, options))]
    fn run(&self, options: &Options, cwd: &Path) -> RunResult<bool> {
        let settings = self.settings(options)?;
        debug!("root: {}", settings.root.display());
        debug!("user: {}", settings.user.as_deref().unwrap_or("<current>"));
        debug!("log downloads: {}", settings.log_downloads);

        debug!("no fetch-and-commit routine is available");
        self.interrupt.check()?;
        Ok(false)
    }
}
