//! Bridge from the `log` facade to a host-provided [`Logger`].

use std::sync::{Arc, OnceLock};

/// Receives log records from the core library.
///
/// Implement this on the host side to route records into the app's own
/// logging. It is exported via `UniFFI` for use in foreign languages.
///
/// # Examples
///
/// ```rust
/// use cardless_core::logger::{LogLevel, Logger};
///
/// struct StdoutLogger;
///
/// impl Logger for StdoutLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{level:?}] {message}");
///     }
/// }
/// ```
///
/// ## Swift
///
/// ```swift
/// final class CardlessLoggerBridge: Cardless.Logger {
///     static let shared = CardlessLoggerBridge()
///
///     func log(level: Cardless.LogLevel, message: String) {
///         os_log("%{public}@", type: level.osLogType, message)
///     }
/// }
///
/// Cardless.setLogger(logger: CardlessLoggerBridge.shared) // once, at start-up
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs `message` at `level`.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal progress, e.g. a wallet was created.
    Info,
    /// Recoverable problems, e.g. a document slot could not be cleared.
    Warn,
    /// Failures and security events such as tamper detection.
    Error,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

/// Forwards `log` records to the registered foreign [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if !should_forward(record.level(), record.module_path()) {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(record.level().into(), record.args().to_string());
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

/// Debug and trace records are only forwarded from this crate's modules;
/// dependencies are too chatty at those levels.
fn should_forward(level: log::Level, module_path: Option<&str>) -> bool {
    let from_cardless = module_path.is_some_and(|path| path.starts_with("cardless"));
    from_cardless || level <= log::Level::Info
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Registers the host logger and installs the bridge as the global `log`
/// backend.
///
/// Only the first call takes effect; later calls are ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(log::Level::Debug, Some("cardless_core::storage::slots"), true ; "own debug")]
    #[test_case(log::Level::Trace, Some("cardless"), true ; "own trace")]
    #[test_case(log::Level::Debug, Some("tokio::runtime"), false ; "dependency debug")]
    #[test_case(log::Level::Trace, None, false ; "unknown trace")]
    #[test_case(log::Level::Warn, Some("tokio::runtime"), true ; "dependency warn")]
    #[test_case(log::Level::Info, None, true ; "unknown info")]
    fn test_should_forward(level: log::Level, module: Option<&str>, expected: bool) {
        assert_eq!(should_forward(level, module), expected);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogLevel::from(log::Level::Error), LogLevel::Error);
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Trace);
    }
}
