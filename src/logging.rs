//! Logging configuration driven by the `-v` count
//!
//! | verbosity | level   | records <= INFO      | records > INFO       |
//! |-----------|---------|----------------------|----------------------|
//! | 0         | WARNING | `{message}`          | `{LEVEL}: {message}` |
//! | 1         | INFO    | `{LEVEL}: {message}` | `{LEVEL}: {message}` |
//! | 2         | DEBUG   | `{LEVEL}: {message}` | `{LEVEL}: {message}` |
//! | 3+        | DEBUG   | `{LEVEL}: {module}:{line}: {message}` (both) |
//!
//! A [`Logger`] owns its own `tracing` dispatcher; nothing is installed
//! globally. Code that should log through it runs inside [`Logger::in_scope`].

use std::fmt;

use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Highest verbosity count with its own behaviour; larger counts act like it.
pub const MAX_VERBOSITY: u8 = 3;

/// Layout of a single rendered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `{message}`
    Message,
    /// `{LEVEL}: {message}`
    Level,
    /// `{LEVEL}: {module}:{line}: {message}`
    Location,
}

impl LogFormat {
    pub fn render(&self, level: &Level, message: &str, context: &RecordContext<'_>) -> String {
        match self {
            LogFormat::Message => message.to_string(),
            LogFormat::Level => format!("{}: {}", level_name(level), message),
            LogFormat::Location => format!(
                "{}: {}:{}: {}",
                level_name(level),
                context.module,
                context
                    .line
                    .map_or_else(|| "?".to_string(), |line| line.to_string()),
                message
            ),
        }
    }
}

/// Where a record was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext<'a> {
    pub module: &'a str,
    pub line: Option<u32>,
}

/// Level filter plus the format pair chosen for a verbosity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Used for records at INFO severity or below
    pub default_format: LogFormat,
    /// Used for WARNING and ERROR records
    pub verbose_format: LogFormat,
}

impl LogConfig {
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity.min(MAX_VERBOSITY) {
            0 => Self {
                level: LevelFilter::WARN,
                default_format: LogFormat::Message,
                verbose_format: LogFormat::Level,
            },
            1 => Self {
                level: LevelFilter::INFO,
                default_format: LogFormat::Level,
                verbose_format: LogFormat::Level,
            },
            2 => Self {
                level: LevelFilter::DEBUG,
                default_format: LogFormat::Level,
                verbose_format: LogFormat::Level,
            },
            _ => Self {
                level: LevelFilter::DEBUG,
                default_format: LogFormat::Location,
                verbose_format: LogFormat::Location,
            },
        }
    }
}

/// Event formatter that picks its layout from each record's severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityFormatter {
    default_format: LogFormat,
    verbose_format: LogFormat,
}

impl SeverityFormatter {
    pub fn new(default_format: LogFormat, verbose_format: LogFormat) -> Self {
        Self {
            default_format,
            verbose_format,
        }
    }

    /// Render one record, without the trailing newline.
    pub fn render(&self, level: &Level, message: &str, context: &RecordContext<'_>) -> String {
        let format = if is_above_info(level) {
            self.verbose_format
        } else {
            self.default_format
        };
        format.render(level, message, context)
    }
}

impl From<&LogConfig> for SeverityFormatter {
    fn from(config: &LogConfig) -> Self {
        Self::new(config.default_format, config.verbose_format)
    }
}

impl<S, N> FormatEvent<S, N> for SeverityFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let metadata = event.metadata();
        let context = RecordContext {
            module: metadata.module_path().unwrap_or_else(|| metadata.target()),
            line: metadata.line(),
        };
        writeln!(writer, "{}", self.render(metadata.level(), &message, &context))
    }
}

/// A configured logger: the active level and formatter bound to a writer.
pub struct Logger {
    config: LogConfig,
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger writing to stderr.
    pub fn configure(verbosity: u8) -> Self {
        Self::with_writer(verbosity, std::io::stderr)
    }

    pub fn with_writer<W>(verbosity: u8, make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let config = LogConfig::from_verbosity(verbosity);

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(make_writer)
            .event_format(SeverityFormatter::from(&config))
            .with_filter(config.level);

        let dispatch = Dispatch::new(tracing_subscriber::registry().with(fmt_layer));

        Self { config, dispatch }
    }

    /// Run `f` with this logger receiving every `tracing` record on the
    /// current thread.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// WARNING and ERROR records.
fn is_above_info(level: &Level) -> bool {
    *level == Level::WARN || *level == Level::ERROR
}

fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::LogCapture;
    use rstest::rstest;
    use tracing::{debug, error, info, warn};

    const CONTEXT: RecordContext<'static> = RecordContext {
        module: "curmit::runner",
        line: Some(42),
    };

    #[rstest]
    #[case(0, LevelFilter::WARN, LogFormat::Message, LogFormat::Level)]
    #[case(1, LevelFilter::INFO, LogFormat::Level, LogFormat::Level)]
    #[case(2, LevelFilter::DEBUG, LogFormat::Level, LogFormat::Level)]
    #[case(3, LevelFilter::DEBUG, LogFormat::Location, LogFormat::Location)]
    #[case(9, LevelFilter::DEBUG, LogFormat::Location, LogFormat::Location)]
    fn given_verbosity_when_configuring_then_selects_level_and_formats(
        #[case] verbosity: u8,
        #[case] level: LevelFilter,
        #[case] default_format: LogFormat,
        #[case] verbose_format: LogFormat,
    ) {
        let config = LogConfig::from_verbosity(verbosity);
        assert_eq!(config.level, level);
        assert_eq!(config.default_format, default_format);
        assert_eq!(config.verbose_format, verbose_format);
    }

    #[rstest]
    #[case(0, "hello", "WARNING: careful")]
    #[case(1, "INFO: hello", "WARNING: careful")]
    #[case(2, "INFO: hello", "WARNING: careful")]
    #[case(
        3,
        "INFO: curmit::runner:42: hello",
        "WARNING: curmit::runner:42: careful"
    )]
    fn given_verbosity_when_rendering_then_branches_on_severity(
        #[case] verbosity: u8,
        #[case] expected_info: &str,
        #[case] expected_warn: &str,
    ) {
        let formatter = SeverityFormatter::from(&LogConfig::from_verbosity(verbosity));

        assert_eq!(formatter.render(&Level::INFO, "hello", &CONTEXT), expected_info);
        assert_eq!(formatter.render(&Level::WARN, "careful", &CONTEXT), expected_warn);
    }

    #[test]
    fn given_error_record_when_rendering_quietly_then_prefixes_level() {
        let formatter = SeverityFormatter::new(LogFormat::Message, LogFormat::Level);
        assert_eq!(formatter.render(&Level::ERROR, "boom", &CONTEXT), "ERROR: boom");
        assert_eq!(formatter.render(&Level::DEBUG, "quiet", &CONTEXT), "quiet");
    }

    #[test]
    fn given_unknown_line_when_rendering_location_then_uses_placeholder() {
        let context = RecordContext {
            module: "curmit",
            line: None,
        };
        assert_eq!(
            LogFormat::Location.render(&Level::DEBUG, "msg", &context),
            "DEBUG: curmit:?: msg"
        );
    }

    #[test]
    fn given_default_verbosity_when_logging_then_drops_info_and_prefixes_warnings() {
        let capture = LogCapture::new();
        let logger = Logger::with_writer(0, capture.clone());

        logger.in_scope(|| {
            debug!("not shown");
            info!("not shown either");
            warn!("disk almost full");
            error!("disk full");
        });

        assert_eq!(capture.lines(), vec!["WARNING: disk almost full", "ERROR: disk full"]);
    }

    #[test]
    fn given_verbosity_two_when_logging_then_emits_debug_with_level() {
        let capture = LogCapture::new();
        let logger = Logger::with_writer(2, capture.clone());

        logger.in_scope(|| {
            debug!("fetching");
            info!("done");
        });

        assert_eq!(capture.lines(), vec!["DEBUG: fetching", "INFO: done"]);
    }

    #[test]
    fn given_verbosity_three_when_logging_then_includes_module_and_line() {
        let capture = LogCapture::new();
        let logger = Logger::with_writer(3, capture.clone());

        logger.in_scope(|| info!("located"));

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(
            lines[0].starts_with("INFO: curmit::logging::tests:"),
            "unexpected record: {}",
            lines[0]
        );
        assert!(lines[0].ends_with(": located"));
    }

    #[test]
    fn given_structured_fields_when_logging_then_renders_them_after_message() {
        let capture = LogCapture::new();
        let logger = Logger::with_writer(1, capture.clone());

        logger.in_scope(|| info!(count = 3, "committed"));

        assert_eq!(capture.lines(), vec!["INFO: committed count=3"]);
    }

    #[test]
    fn given_reconfiguration_when_logging_then_latest_logger_wins() {
        let first = LogCapture::new();
        let second = LogCapture::new();
        let quiet = Logger::with_writer(0, first.clone());
        let verbose = Logger::with_writer(1, second.clone());

        quiet.in_scope(|| info!("dropped"));
        verbose.in_scope(|| info!("kept"));

        assert!(first.lines().is_empty());
        assert_eq!(second.lines(), vec!["INFO: kept"]);
    }
}
