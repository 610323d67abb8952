//! Logging setup for redtag.
//!
//! Diagnostics go to standard error through a `tracing` subscriber, so that
//! command output on standard output (reports, `export --stdout`) stays
//! clean. The level follows the CLI verbosity flags unless `RUST_LOG` is set.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Debug and above.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Resolve the `-v` count and `-q` flag; `quiet` wins.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The most detailed level emitted.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.level())
    }
}

/// Initialize the logging system.
///
/// Call once at startup; later calls are ignored. `RUST_LOG` takes
/// precedence over `verbosity`.
///
/// # Examples
///
/// ```no_run
/// use redtag::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity != Verbosity::Normal),
    );

    // Already installed
    let _ = subscriber.try_init();
}

/// Route warnings and errors to the test harness output.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(2, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(9, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(2, true), Verbosity::Quiet);
    }

    #[test]
    fn test_levels() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::default().level(), Level::WARN);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_directive_names_crate() {
        assert_eq!(Verbosity::Verbose.directive(), "redtag=DEBUG");
        assert_eq!(Verbosity::Quiet.directive(), "redtag=ERROR");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
