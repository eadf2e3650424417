#![deny(missing_docs)]
//! Shared logging utilities for the dashboard workspace.
//!
//! This crate provides the `dashboard_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger.
//!
//! Every line carries a `[run N]` prefix. By default `N` is the run recorded
//! for the current thread with [`set_active_run`]. Code running on pool
//! threads, where that record means nothing, names the run explicitly:
//! `dashboard_info!(run = run_id; "fetched {}", url)`.

use std::cell::Cell;

thread_local! {
    /// Run id of the job the current thread is reporting on (0 = none).
    static ACTIVE_RUN: Cell<u64> = const { Cell::new(0) };
}

/// Records the run id the current thread is working on.
/// The app loop calls this whenever a new job handle is created or dropped.
pub fn set_active_run(run_id: u64) {
    ACTIVE_RUN.with(|v| v.set(run_id));
}

/// Retrieves the run id recorded for the current thread.
/// Returns 0 if no run is active.
pub fn active_run() -> u64 {
    ACTIVE_RUN.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! dashboard_trace {
    (run = $run:expr; $($arg:tt)+) => {{
        log::trace!("[run {}] {}", $run, format_args!($($arg)+));
    }};
    ($($arg:tt)*) => {{
        log::trace!("[run {}] {}", $crate::active_run(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! dashboard_debug {
    (run = $run:expr; $($arg:tt)+) => {{
        log::debug!("[run {}] {}", $run, format_args!($($arg)+));
    }};
    ($($arg:tt)*) => {{
        log::debug!("[run {}] {}", $crate::active_run(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! dashboard_info {
    (run = $run:expr; $($arg:tt)+) => {{
        log::info!("[run {}] {}", $run, format_args!($($arg)+));
    }};
    ($($arg:tt)*) => {{
        log::info!("[run {}] {}", $crate::active_run(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! dashboard_warn {
    (run = $run:expr; $($arg:tt)+) => {{
        log::warn!("[run {}] {}", $run, format_args!($($arg)+));
    }};
    ($($arg:tt)*) => {{
        log::warn!("[run {}] {}", $crate::active_run(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! dashboard_error {
    (run = $run:expr; $($arg:tt)+) => {{
        log::error!("[run {}] {}", $run, format_args!($($arg)+));
    }};
    ($($arg:tt)*) => {{
        log::error!("[run {}] {}", $crate::active_run(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_run_defaults_to_zero_and_is_per_thread() {
        assert_eq!(active_run(), 0);
        set_active_run(7);
        assert_eq!(active_run(), 7);
        let other = std::thread::spawn(active_run).join().unwrap();
        assert_eq!(other, 0);
        set_active_run(0);
    }
}
