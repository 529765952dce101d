//! Logging setup for filterkit.
//!
//! The engine emits `tracing` events; this module installs a subscriber
//! for applications that do not bring their own.
//!
//! # Environment Variables
//!
//! - `FILTERKIT_DEBUG=true|1|yes` - Enable debug logging
//! - `FILTERKIT_LOG_LEVEL=trace|debug|info|warn|error` - Set specific log level
//! - `FILTERKIT_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! ```rust,no_run
//! use filterkit_query::logging;
//!
//! // Call once at startup
//! logging::init();
//! ```

use std::env;
use std::sync::{Once, OnceLock};

static INIT: Once = Once::new();
static DEBUG_EVENTS: OnceLock<bool> = OnceLock::new();

#[doc(hidden)]
pub use tracing as __tracing;

/// Check if debug logging is enabled via `FILTERKIT_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("FILTERKIT_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// `FILTERKIT_DEBUG` as read on first use, for the hot-path macros.
///
/// Later changes to the environment are not observed.
#[inline]
pub fn debug_events_enabled() -> bool {
    *DEBUG_EVENTS.get_or_init(is_debug_enabled)
}

/// Get the configured log level from `FILTERKIT_LOG_LEVEL`.
///
/// Falls back to "debug" when `FILTERKIT_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("FILTERKIT_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `FILTERKIT_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("FILTERKIT_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the filterkit logging system.
///
/// Subsequent calls are no-ops. Nothing is installed unless
/// `FILTERKIT_DEBUG` or `FILTERKIT_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("FILTERKIT_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!("filterkit={level},filterkit_query={level}"))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            // try_init: the host application may already own the global subscriber
            let installed = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "filterkit logging initialized"
                );
            }
        }
    });
}

/// Debug event that is only emitted when `FILTERKIT_DEBUG` is enabled.
#[macro_export]
macro_rules! filterkit_debug {
    ($($arg:tt)*) => {
        if $crate::logging::debug_events_enabled() {
            $crate::logging::__tracing::debug!($($arg)*);
        }
    };
}

/// Trace event that is only emitted when `FILTERKIT_DEBUG` is enabled.
#[macro_export]
macro_rules! filterkit_trace {
    ($($arg:tt)*) => {
        if $crate::logging::debug_events_enabled() {
            $crate::logging::__tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_defaults() {
        // SAFETY: these variables are only touched by this test
        unsafe {
            env::remove_var("FILTERKIT_DEBUG");
            env::remove_var("FILTERKIT_LOG_LEVEL");
            env::remove_var("FILTERKIT_LOG_FORMAT");
        }
        assert!(!is_debug_enabled());
        assert_eq!(get_log_level(), "warn");
        assert_eq!(get_log_format(), "json");
    }

    #[test]
    fn test_debug_events_flag_is_stable() {
        let first = debug_events_enabled();
        for _ in 0..3 {
            assert_eq!(debug_events_enabled(), first);
        }
    }

    #[test]
    fn test_macros_expand_through_crate_path() {
        crate::filterkit_debug!(target: "filterkit_query", "debug event");
        crate::filterkit_trace!(variants = 3, "trace event");
    }
}
