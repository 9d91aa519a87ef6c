//! Logging bootstrap.
//!
//! Library code logs through the `log` facade with `event=... key=value`
//! messages; binaries call [`init_logging`] once to attach a stderr backend.
//!
//! # Invariants
//! - Initialization is idempotent for the same level.
//! - Re-initialization with a different level is rejected, not applied.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    _logger: LoggerHandle,
}

const SUPPORTED_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn normalize_level(level: &str) -> Result<String, String> {
    let normalized = level.trim().to_lowercase();
    if SUPPORTED_LEVELS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(format!(
            "unsupported log level `{}` (expected one of {})",
            level,
            SUPPORTED_LEVELS.join(", ")
        ))
    }
}

/// Start logging to stderr at `level`.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level, level
            ));
        }
        return Ok(());
    }

    let init_level = level.clone();
    LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_env_or_str(&init_level)
            .map_err(|err| format!("invalid log level `{}`: {}", init_level, err))?
            .format(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("failed to start logger: {}", err))?;

        info!(
            "event=app_start version={} level={}",
            env!("CARGO_PKG_VERSION"),
            init_level
        );

        Ok(LoggingState {
            level: init_level,
            _logger: logger,
        })
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("trace").unwrap(), "trace");
        assert!(normalize_level("loud").is_err());
    }

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_logging("warn").is_ok());
        assert!(init_logging("WARN").is_ok());
        assert!(init_logging("debug").is_err());
    }
}
