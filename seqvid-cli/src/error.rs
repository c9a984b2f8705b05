// ============================================================================
// seqvid-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses CoreError and adds a context helper for failures that only
// happen at the command-line layer (log directories, JSON output).

use seqvid_core::{CoreError, CoreResult};

use std::fmt;

/// Exit code for errors that are not a conversion status.
pub const ERROR_EXIT_CODE: i32 = 3;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::Config(format!("{context}: {core_error}"))
        })
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::Config(format!("{}: {}", f(), core_error))
        })
    }
}

/// Maps a status-bearing error to its status code.
///
/// `DirectoryNotFound` and `EmptySequence` carry the same codes as the
/// conversion outcomes; everything else is [`ERROR_EXIT_CODE`].
#[must_use]
pub fn exit_code_for(error: &CoreError) -> i32 {
    match error {
        CoreError::EmptySequence(_) => 1,
        CoreError::DirectoryNotFound(_) => 2,
        _ => ERROR_EXIT_CODE,
    }
}
