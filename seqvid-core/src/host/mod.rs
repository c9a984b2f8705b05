// ============================================================================
// seqvid-core/src/host/mod.rs
// ============================================================================
//
// HOST: The Rendering Environment a Conversion Runs Inside
//
// A conversion does not decode, composite or encode anything itself. It
// borrows a host: something with a notion of an active work context, a view
// mode, a sequencer that accepts an ordered image strip, and a renderer that
// encodes a frame range to a video file. This module defines that contract.
//
// KEY COMPONENTS:
// - Host: Trait implemented by rendering environments
// - RenderSettings: The explicit record handed to the renderer
// - FfmpegHost: Host backed by staging directories and the ffmpeg CLI
// - unique_context_name: Collision-free naming for ephemeral contexts

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Container, EncodingSpeed, QualityTier};
use crate::error::CoreResult;

mod ffmpeg_host;

pub use ffmpeg_host::{FfmpegHost, PRIMARY_CONTEXT_NAME, STRIP_LIST_FILE};

/// Handle of a work context inside a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the host's working area is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AreaMode {
    /// Whatever the user had open.
    #[default]
    Default,
    /// The sequence editor, used while a strip is being rendered.
    Sequencer,
}

/// Pixel dimensions of an image or output video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Ordered images placed on the sequencer as consecutive frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStrip {
    /// Directory the images were collected from
    pub directory: PathBuf,
    /// Image files in playback order
    pub files: Vec<PathBuf>,
    /// First timeline frame the strip occupies
    pub frame_start: u32,
    /// Last timeline frame the strip occupies
    pub frame_end: u32,
}

/// Everything the renderer needs to encode one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSettings {
    pub container: Container,
    pub quality: QualityTier,
    pub speed: EncodingSpeed,
    pub resolution: Dimensions,
    pub frame_start: u32,
    pub frame_end: u32,
    /// Output path without extension; the encoder appends the container's.
    pub output_path: PathBuf,
    /// Render samples per frame. Frames are existing images, so this is 1.
    pub samples: u32,
    pub frame_rate: u32,
    pub bitrate_kbps: u32,
}

impl RenderSettings {
    /// Number of frames in the configured range.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_end.saturating_sub(self.frame_start) + 1
    }

    /// The file the encoder writes: `output_path` plus the container extension.
    #[must_use]
    pub fn output_file(&self) -> PathBuf {
        with_appended_extension(&self.output_path, self.container.extension())
    }
}

/// A rendering environment a conversion can borrow.
///
/// Implementations own the "active context" and "area mode" state that a
/// conversion swaps out for its duration and puts back afterwards.
pub trait Host {
    /// The context currently active in the host.
    fn active_context(&self) -> ContextId;

    /// Makes `context` the active one.
    fn set_active_context(&mut self, context: &ContextId) -> CoreResult<()>;

    /// Current area mode.
    fn area_mode(&self) -> AreaMode;

    /// Switches the area mode.
    fn set_area_mode(&mut self, mode: AreaMode);

    /// Whether a context called `name` exists (or its name is otherwise taken).
    fn context_exists(&self, name: &str) -> bool;

    /// Creates a new, empty context called `name`.
    fn create_context(&mut self, name: &str) -> CoreResult<ContextId>;

    /// Destroys `context` and everything it holds.
    fn remove_context(&mut self, context: &ContextId) -> CoreResult<()>;

    /// Pixel dimensions of the image at `path`.
    fn image_dimensions(&self, path: &Path) -> CoreResult<Dimensions>;

    /// Places `strip` on the sequencer of `context`.
    fn add_image_strip(&mut self, context: &ContextId, strip: &ImageStrip) -> CoreResult<()>;

    /// Renders `context` with `settings`, returning the written file.
    fn render(&mut self, context: &ContextId, settings: &RenderSettings) -> CoreResult<PathBuf>;
}

/// Picks an unused context name.
///
/// `base` itself when free, otherwise `base2`, `base3`, ... until the host
/// reports a name as unused.
pub fn unique_context_name<H: Host + ?Sized>(host: &H, base: &str) -> String {
    if !host.context_exists(base) {
        return base.to_string();
    }
    let mut counter: u32 = 1;
    loop {
        counter += 1;
        let candidate = format!("{base}{counter}");
        if !host.context_exists(&candidate) {
            return candidate;
        }
    }
}

/// Appends `.ext` without replacing an existing dotted suffix (`shot.v2` stays intact).
pub(crate) fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockHost;

    fn settings(output: &str, container: Container) -> RenderSettings {
        RenderSettings {
            container,
            quality: QualityTier::High,
            speed: EncodingSpeed::Good,
            resolution: Dimensions { width: 640, height: 480 },
            frame_start: 1,
            frame_end: 12,
            output_path: PathBuf::from(output),
            samples: 1,
            frame_rate: 24,
            bitrate_kbps: 6000,
        }
    }

    #[test]
    fn test_unique_context_name_counts_from_two() {
        let mut host = MockHost::new();
        assert_eq!(unique_context_name(&host, "img2vid"), "img2vid");

        host.create_context("img2vid").unwrap();
        assert_eq!(unique_context_name(&host, "img2vid"), "img2vid2");

        host.create_context("img2vid2").unwrap();
        host.create_context("img2vid3").unwrap();
        assert_eq!(unique_context_name(&host, "img2vid"), "img2vid4");
    }

    #[test]
    fn test_render_settings_output_file() {
        let s = settings("/renders/shot", Container::Matroska);
        assert_eq!(s.output_file(), PathBuf::from("/renders/shot.mkv"));
        assert_eq!(s.frame_count(), 12);

        let dotted = settings("/renders/shot.v2", Container::Mpeg4);
        assert_eq!(dotted.output_file(), PathBuf::from("/renders/shot.v2.mp4"));
    }
}
