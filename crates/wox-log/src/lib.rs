//! Leveled logging for the wox toolchain.
//!
//! Log lines are written to stderr so they never interleave with the output
//! a wox program produces through `print`. The level is process-wide and
//! defaults to [`Level::Warn`]; drivers usually call [`init_from_env`] once
//! at startup and let `WOX_LOG=debug` (or similar) raise it.
//!
//! # Example
//!
//! ```
//! use wox_log::{debug, info, Level};
//!
//! wox_log::set_level(Level::Debug);
//!
//! let tokens = 12;
//! info!("scanned {} tokens", tokens);
//! debug!("frames alive: {:?}", [1, 2]);
//! ```

use std::fmt::{self, Arguments};
use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "WOX_LOG";

/// Severity of a log line, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures the user must see
    Error = 0,
    /// Suspicious but recoverable situations
    Warn = 1,
    /// High-level progress (file loaded, session started)
    Info = 2,
    /// Per-phase detail (token counts, parser synchronization)
    Debug = 3,
    /// Per-node detail (calls, scope entry)
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warn => "\x1b[33m",
            Self::Info => "\x1b[32m",
            Self::Debug => "\x1b[36m",
            Self::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case label printed in front of each line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log level '{}' (expected error, warn, info, debug or trace)",
            self.input
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use wox_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// Process-wide logger state.
pub struct Logger {
    level: AtomicU8,
    colors: AtomicBool,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            colors: AtomicBool::new(true),
        }
    }

    /// Sets the most verbose level that will still be written.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Enables or disables ANSI colours on the level label.
    pub fn set_colors(&self, enabled: bool) {
        self.colors.store(enabled, Ordering::SeqCst);
    }

    /// Returns `true` if lines at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    fn write_line(&self, level: Level, target: &str, args: Arguments<'_>) {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        // A closed stderr is not worth aborting the interpreter over.
        let _ = if self.colors.load(Ordering::Relaxed) {
            writeln!(
                handle,
                "{}[{}]\x1b[0m {target}: {args}",
                level.color_code(),
                level.as_str()
            )
        } else {
            writeln!(handle, "[{}] {target}: {args}", level.as_str())
        };
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at [`Level::Warn`] on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn))
}

/// Sets the global level.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the global level from its name.
///
/// # Errors
///
/// Returns [`ParseLevelError`] when `s` names no level; the current level is
/// left untouched.
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    set_level(s.parse()?);
    Ok(())
}

/// Configures the global logger from [`LOG_ENV_VAR`] and `NO_COLOR`.
///
/// An unset variable keeps the current level. An unparsable one is reported
/// once at warn level and otherwise ignored.
pub fn init_from_env() {
    if std::env::var_os("NO_COLOR").is_some() {
        get_logger().set_colors(false);
    }
    if let Ok(value) = std::env::var(LOG_ENV_VAR)
        && let Err(err) = set_level_from_str(&value)
    {
        crate::warn!("{LOG_ENV_VAR}: {err}");
    }
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments<'_>) {
    let logger = get_logger();
    if logger.enabled(level) {
        logger.write_line(level, target, args);
    }
}

/// Logs at an explicit level, tagging the line with the caller's module path.
///
/// ```
/// use wox_log::{log, Level};
///
/// log!(level: Level::Error, "cannot open {}", "main.wox");
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {{
        let level = $level;
        if $crate::get_logger().enabled(level) {
            $crate::__log_with_target(level, module_path!(), format_args!($($arg)*));
        }
    }};
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("ERROR".parse::<Level>(), Ok(Level::Error));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!(" Trace ".parse::<Level>(), Ok(Level::Trace));
        let err = "verbose".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_level_display_round_trip() {
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
            assert_eq!(Level::from_u8(level as u8), level);
        }
    }

    #[test]
    fn test_logger_filtering() {
        let logger = Logger::new(Level::Warn);
        assert!(logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Warn));
        assert!(!logger.enabled(Level::Info));

        logger.set_level(Level::Trace);
        assert!(logger.enabled(Level::Trace));
        assert_eq!(logger.level(), Level::Trace);
    }

    #[test]
    fn test_set_level_from_str_keeps_level_on_error() {
        set_level(Level::Info);
        assert!(set_level_from_str("nonsense").is_err());
        assert_eq!(get_logger().level(), Level::Info);
        set_level_from_str("debug").unwrap();
        assert_eq!(get_logger().level(), Level::Debug);
        set_level(Level::Warn);
    }

    #[test]
    fn test_macros_expand() {
        get_logger().set_colors(false);
        trace!("suppressed at the default level {}", 1);
        error!("rendered without colour: {:?}", (1, 2));
        get_logger().set_colors(true);
    }
}
