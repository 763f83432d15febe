//! Diagnostic output for the `paris` binary.
//!
//! Dendrogram rows own `stdout`, so every diagnostic goes to `stderr` through
//! one global `tracing` subscriber. Its format and filter are resolved into a
//! [`LoggingConfig`] from the command line first and the environment second,
//! then installed once by [`init_logging`].

use std::{env, str::FromStr, sync::OnceLock};

use clap::{ArgAction, Args, ValueEnum};
use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::ParseError,
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Environment variable selecting `human` or `json` output.
pub const LOG_FORMAT_ENV: &str = "PARIS_LOG_FORMAT";
/// Environment variable holding filter directives. `RUST_LOG` is consulted
/// when it is unset.
pub const LOG_FILTER_ENV: &str = "PARIS_LOG";

const FALLBACK_FILTER_ENV: &str = "RUST_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Errors raised while resolving or installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: env::VarError,
    },
    /// Unsupported log format requested via `PARIS_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value supplied by the user.
        provided: String,
    },
    /// Filter directives could not be parsed.
    #[error("invalid log filter `{directives}`: {source}")]
    InvalidFilter {
        /// The rejected directives.
        directives: String,
        /// Parser failure from `tracing_subscriber`.
        #[source]
        source: ParseError,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: TryInitError,
    },
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line, with the current span and span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Logging flags accepted before or after any subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct LogArgs {
    /// Diagnostic format; overrides `PARIS_LOG_FORMAT`.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Raise verbosity: `-v` logs each component, `-vv` every merge.
    /// Overrides `PARIS_LOG` and `RUST_LOG`.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Subscriber settings after flags and environment have been combined.
///
/// # Examples
/// ```
/// use paris_cli::logging::{LogArgs, LogFormat, LoggingConfig};
///
/// let args = LogArgs { log_format: None, verbose: 1 };
/// let config = LoggingConfig::from_lookup(&args, |name| match name {
///     "PARIS_LOG_FORMAT" => Ok("json".to_owned()),
///     _ => Err(std::env::VarError::NotPresent),
/// })?;
/// assert_eq!(config.format(), LogFormat::Json);
/// assert_eq!(config.directives(), "debug");
/// # Ok::<(), paris_cli::logging::LoggingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    format: LogFormat,
    directives: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            directives: DEFAULT_DIRECTIVES.to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Resolves settings from `args` and the process environment.
    ///
    /// # Errors
    /// See [`Self::from_lookup`].
    pub fn resolve(args: &LogArgs) -> Result<Self, LoggingError> {
        Self::from_lookup(args, env::var)
    }

    /// Resolves settings from `args`, reading variables through `lookup`.
    ///
    /// Flags win over variables. Blank variables count as unset. The filter
    /// falls back from `PARIS_LOG` to `RUST_LOG` to `info`.
    ///
    /// # Errors
    /// Returns [`LoggingError::InvalidUnicode`] when a consulted variable is
    /// not UTF-8 and [`LoggingError::UnsupportedFormat`] for an unknown
    /// format name.
    pub fn from_lookup(
        args: &LogArgs,
        lookup: impl Fn(&'static str) -> Result<String, env::VarError>,
    ) -> Result<Self, LoggingError> {
        let format = match args.log_format {
            Some(format) => format,
            None => read_var(&lookup, LOG_FORMAT_ENV)?
                .map_or(Ok(LogFormat::Human), |raw| raw.parse())?,
        };
        let directives = match verbosity_directives(args.verbose) {
            Some(directives) => directives.to_owned(),
            None => match read_var(&lookup, LOG_FILTER_ENV)? {
                Some(raw) => raw,
                None => read_var(&lookup, FALLBACK_FILTER_ENV)?
                    .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_owned()),
            },
        };
        Ok(Self { format, directives })
    }

    /// Selected output format.
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Filter directives in `EnvFilter` syntax.
    #[must_use]
    pub fn directives(&self) -> &str {
        &self.directives
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.directives).map_err(|source| LoggingError::InvalidFilter {
            directives: self.directives.clone(),
            source,
        })
    }
}

fn verbosity_directives(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

fn read_var(
    lookup: &impl Fn(&'static str) -> Result<String, env::VarError>,
    name: &'static str,
) -> Result<Option<String>, LoggingError> {
    match lookup(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source @ env::VarError::NotUnicode(_)) => {
            Err(LoggingError::InvalidUnicode { name, source })
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// Only the first successful call installs anything. A subscriber installed
/// by someone else is reported on `stderr` and tolerated.
///
/// # Errors
/// Returns [`LoggingError::InvalidFilter`] when the directives do not parse.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    match install_subscriber(config) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => report_existing_subscriber(&source),
        Err(err) => return Err(err),
    }
    let _ = INSTALLED.set(());
    Ok(())
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is owned by another subscriber, so stderr is the only channel"
)]
fn report_existing_subscriber(source: &TryInitError) {
    eprintln!("structured logging already configured elsewhere: {source}");
}

fn install_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;

    // Chain and fit spans report their recorded fields when they close.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let fmt_layer = match config.format() {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    // Another logger may already own the `log` slot.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}
