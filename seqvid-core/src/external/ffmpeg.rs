//! FFmpeg command building for encoding an image strip.
//!
//! The strip reaches ffmpeg as an ffconcat list, one `file` line per frame in
//! playback order. Frames are retimed to the configured frame rate, cut to the
//! render frame range and scaled to the render resolution before encoding.

use crate::config::QualityTier;
use crate::error::CoreResult;
use crate::host::RenderSettings;

use ffmpeg_sidecar::command::FfmpegCommand;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pixel format of every encode; the widest player compatibility for x264 and VP9.
pub const OUTPUT_PIX_FMT: &str = "yuv420p";

/// Writes an ffconcat list for `files` at `list_path`.
pub fn write_concat_list(list_path: &Path, files: &[PathBuf]) -> CoreResult<()> {
    let mut out = fs::File::create(list_path)?;
    writeln!(out, "ffconcat version 1.0")?;
    for file in files {
        writeln!(out, "file {}", quote_concat_path(file))?;
    }
    out.flush()?;
    log::debug!("Wrote concat list with {} entries to {}", files.len(), list_path.display());
    Ok(())
}

/// Quotes a path for an ffconcat `file` directive.
///
/// Single quotes close the quoted span, emit an escaped quote and reopen it.
#[must_use]
pub fn quote_concat_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Video filter chain for the render: trim, retime, scale.
#[must_use]
pub fn build_filter_chain(settings: &RenderSettings) -> String {
    let scale_flags = if settings.samples <= 1 { "bilinear" } else { "lanczos" };
    format!(
        "trim=start_frame={start}:end_frame={end},setpts=N/({rate}*TB),scale={w}:{h}:flags={flags}",
        start = settings.frame_start.saturating_sub(1),
        end = settings.frame_end,
        rate = settings.frame_rate,
        w = settings.resolution.width,
        h = settings.resolution.height,
        flags = scale_flags,
    )
}

/// Builds the ffmpeg command encoding the strip listed in `strip_list`.
pub fn build_encode_command(strip_list: &Path, settings: &RenderSettings) -> FfmpegCommand {
    let container = settings.container;
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner();
    cmd.overwrite();
    cmd.args(["-f", "concat", "-safe", "0"]);
    cmd.input(strip_list.to_string_lossy().as_ref());

    cmd.args(["-vf", &build_filter_chain(settings)]);
    cmd.args(["-r", &settings.frame_rate.to_string()]);
    cmd.args(["-frames:v", &settings.frame_count().to_string()]);

    cmd.args(["-c:v", container.video_codec()]);
    cmd.args(["-pix_fmt", OUTPUT_PIX_FMT]);

    match (settings.quality, settings.quality.crf()) {
        (QualityTier::ConstantBitrate, _) | (_, None) => {
            let rate = format!("{}k", settings.bitrate_kbps);
            let bufsize = format!("{}k", settings.bitrate_kbps.saturating_mul(2));
            cmd.args(["-b:v", &rate, "-minrate", &rate, "-maxrate", &rate]);
            cmd.args(["-bufsize", &bufsize]);
        }
        (QualityTier::Lossless, _) if container.is_vp9() => {
            cmd.args(["-lossless", "1"]);
        }
        (_, Some(crf)) => {
            cmd.args(["-crf", &crf.to_string()]);
            if container.is_vp9() {
                // Constant quality mode for libvpx needs the bitrate cap lifted.
                cmd.args(["-b:v", "0"]);
            }
        }
    }

    if container.is_vp9() {
        cmd.args(["-deadline", settings.speed.vpx_deadline()]);
    } else {
        cmd.args(["-preset", settings.speed.x264_preset()]);
    }

    cmd.args(["-an"]);
    cmd.args(["-f", container.muxer()]);
    cmd.output(settings.output_file().to_string_lossy().as_ref());
    cmd
}
