// ============================================================================
// seqvid-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the ffmpeg and ffprobe CLIs
//
// This module encapsulates everything that shells out: building the encode
// command, spawning ffmpeg, probing image dimensions with ffprobe and checking
// that the tools are installed. Process spawning sits behind the
// FfmpegSpawner trait so the ffmpeg host can be driven by a mock in tests.
//
// KEY COMPONENTS:
// - Traits for ffmpeg process interaction (FfmpegSpawner, FfmpegProcess)
// - Encode command construction from RenderSettings
// - Image dimension probing via the ffprobe crate
// - Dependency checking functions

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains ffmpeg argument building for encoding an image strip
pub mod ffmpeg;

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains image probing through ffprobe
pub mod ffprobe_executor;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{build_encode_command, write_concat_list};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::probe_image_dimensions;

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs `<cmd_name> -version` with its output discarded.
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_reports_missing_command() {
        let result = check_dependency("seqvid-surely-not-an-installed-binary");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
