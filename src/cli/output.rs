//! Messages curmit prints itself, outside the logger
//!
//! `NO_COLOR` turns colour off and `CLICOLOR_FORCE` turns it on.

use std::fmt::Display;

use colored::Colorize;

/// Report an error the run could not recover from.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}", error_line(msg));
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}", warning_line(msg));
}

fn error_line(msg: &(impl Display + ?Sized)) -> String {
    format!("{}: {msg}", "error".red().bold())
}

fn warning_line(msg: &(impl Display + ?Sized)) -> String {
    format!("{}: {msg}", "warning".yellow().bold())
}
