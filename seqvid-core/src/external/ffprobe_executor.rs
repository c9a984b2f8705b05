//! FFprobe integration for reading image dimensions.
//!
//! ffprobe opens every still format the sequencer accepts (PNG, JPEG, EXR,
//! TIFF) as a single-frame video stream, which gives the pixel size without
//! decoding the image in-process.
use crate::error::{CoreError, CoreResult, command_start_error};
use crate::host::Dimensions;
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Gets the pixel dimensions of the image at `path`.
pub fn probe_image_dimensions(path: &Path) -> CoreResult<Dimensions> {
    log::debug!("Running ffprobe (via crate) for dimensions of: {}", path.display());
    let metadata = ffprobe(path).map_err(|err| {
        log::error!("ffprobe failed for {}: {:?}", path.display(), err);
        map_ffprobe_error(path, err)
    })?;

    metadata
        .streams
        .iter()
        .find_map(|stream| match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Dimensions {
                width: u32::try_from(w).ok()?,
                height: u32::try_from(h).ok()?,
            }),
            _ => None,
        })
        .ok_or_else(|| CoreError::ImageProbe {
            path: path.to_path_buf(),
            message: "no stream with pixel dimensions".to_string(),
        })
}

fn map_ffprobe_error(path: &Path, err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            CoreError::DependencyNotFound("ffprobe".to_string())
        }
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => CoreError::ImageProbe {
            path: path.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        },
        FfProbeError::Deserialize(err) => CoreError::ImageProbe {
            path: path.to_path_buf(),
            message: format!("unreadable ffprobe output: {err}"),
        },
        other => CoreError::ImageProbe {
            path: path.to_path_buf(),
            message: format!("{other:?}"),
        },
    }
}
