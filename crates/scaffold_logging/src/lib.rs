#![deny(missing_docs)]
//! Shared logging utilities for the scaffolder workspace.
//!
//! Library crates log through the `scaffold_*` macros so that every message
//! carries the `scaffold` target prefix regardless of which module emits it.
//! The binary decides where the records go; tests use
//! [`initialize_for_tests`].

/// Target used by every `scaffold_*` macro.
pub const LOG_TARGET: &str = "scaffold";

/// Logs a trace-level message under the scaffold target.
#[macro_export]
macro_rules! scaffold_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the scaffold target.
#[macro_export]
macro_rules! scaffold_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the scaffold target.
#[macro_export]
macro_rules! scaffold_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the scaffold target.
#[macro_export]
macro_rules! scaffold_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the scaffold target.
#[macro_export]
macro_rules! scaffold_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from many tests: a second initialization is ignored.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
