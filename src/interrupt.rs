//! Ctrl-C handling
//!
//! The first SIGINT sets a shared flag instead of killing the process, so a
//! runner can stop at its next check and the dispatcher can treat the
//! cancellation as a normal exit. A second SIGINT, arriving while the flag is
//! still set, exits immediately with [`crate::exitcode::INTERRUPTED`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{RunError, RunResult};

/// Cloneable view of the "user pressed Ctrl-C" flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// A flag that is only set through [`Interrupt::trigger`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the flag as the SIGINT handler.
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use signal_hook::consts::SIGINT;

        let interrupt = Self::new();
        // Order matters: the shutdown check must see the flag before it is set
        signal_hook::flag::register_conditional_shutdown(
            SIGINT,
            crate::exitcode::INTERRUPTED,
            Arc::clone(&interrupt.flag),
        )?;
        signal_hook::flag::register(SIGINT, Arc::clone(&interrupt.flag))?;
        Ok(interrupt)
    }

    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self::new())
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Bail out with [`RunError::Interrupted`] once the flag is set.
    pub fn check(&self) -> RunResult<()> {
        if self.is_set() {
            Err(RunError::Interrupted)
        } else {
            Ok(())
        }
    }
}
