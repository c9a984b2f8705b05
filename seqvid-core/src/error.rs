// ============================================================================
// seqvid-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Seqvid Core Library
//
// This module defines the error type returned by every fallible operation in
// seqvid-core, together with small constructors for the process-related
// variants used by the ffmpeg executor.
//
// KEY COMPONENTS:
// - CoreError: The error enum
// - CoreResult: Result alias used across the crate
// - command_*_error: Helpers for external process failures

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by seqvid-core.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Sequence collection ----
    #[error("Location not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No files found at the location: {0}")]
    EmptySequence(PathBuf),

    #[error("Frame token '{token}' in '{file}' is not a number")]
    NonNumericFrameToken { file: String, token: String },

    // ---- Host / render context ----
    #[error("Render context '{0}' already exists")]
    ContextExists(String),

    #[error("Unknown render context '{0}'")]
    UnknownContext(String),

    #[error("Render context '{0}' has no image strip")]
    NoImageStrip(String),

    #[error("Frame range {start}..={end} is outside the strip (1..={available})")]
    FrameRange { start: u32, end: u32, available: u32 },

    #[error("Could not read dimensions of '{path}': {message}")]
    ImageProbe { path: PathBuf, message: String },

    #[error("Encoding failed: {0}")]
    HostEncodeFailure(String),

    // ---- External processes ----
    #[error("Required dependency '{0}' was not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    // ---- General ----
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for seqvid-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a process that could not be spawned.
pub fn command_start_error(command: impl Into<String>, error: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), error)
}

/// Builds a [`CoreError::CommandWait`] for a process whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, error: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), error)
}

/// Builds a [`CoreError::CommandFailed`] for a process that exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
