//! Configuration structures and constants for the seqvid-core library.
//!
//! This module provides the encoding configuration record (container, quality
//! tier, speed tier and source directory) together with the ambient settings
//! a conversion needs: where ephemeral render contexts live, the frame rate
//! of the produced video and the bitrate used for constant-bitrate output.

mod builder;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

pub use builder::EncodingConfigBuilder;

// Default constants

/// Frame rate of the produced video when none is configured.
pub const DEFAULT_FRAME_RATE: u32 = 24;

/// Video bitrate (kbit/s) used by [`QualityTier::ConstantBitrate`].
pub const DEFAULT_BITRATE_KBPS: u32 = 6000;

/// Base name of the ephemeral render context. Collisions get a numeric suffix.
pub const DEFAULT_CONTEXT_BASE_NAME: &str = "img2vid";

/// Prefix marking a path as relative to the project root (`//frames`).
pub const PROJECT_RELATIVE_PREFIX: &str = "//";

/// Output container of the encoded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mpeg4,
    Matroska,
    Avi,
    Flash,
    WebM,
}

impl Container {
    /// File extension the encoder appends to the output path.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mpeg4 => "mp4",
            Container::Matroska => "mkv",
            Container::Avi => "avi",
            Container::Flash => "flv",
            Container::WebM => "webm",
        }
    }

    /// Name of the ffmpeg muxer for this container.
    #[must_use]
    pub fn muxer(self) -> &'static str {
        match self {
            Container::Mpeg4 => "mp4",
            Container::Matroska => "matroska",
            Container::Avi => "avi",
            Container::Flash => "flv",
            Container::WebM => "webm",
        }
    }

    /// Video codec used inside this container.
    #[must_use]
    pub fn video_codec(self) -> &'static str {
        match self {
            Container::WebM => "libvpx-vp9",
            _ => "libx264",
        }
    }

    /// Whether the codec for this container is VP9 (different rate/speed options).
    #[must_use]
    pub fn is_vp9(self) -> bool {
        self == Container::WebM
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::Mpeg4 => "mpeg4",
            Container::Matroska => "mkv",
            Container::Avi => "avi",
            Container::Flash => "flash",
            Container::WebM => "webm",
        };
        f.write_str(name)
    }
}

impl FromStr for Container {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mpeg4" | "mp4" => Ok(Container::Mpeg4),
            "mkv" | "matroska" => Ok(Container::Matroska),
            "avi" => Ok(Container::Avi),
            "flash" | "flv" => Ok(Container::Flash),
            "webm" => Ok(Container::WebM),
            other => Err(CoreError::Config(format!(
                "unknown container '{other}' (expected mpeg4, mkv, avi, flash or webm)"
            ))),
        }
    }
}

/// Rate-distortion tier of the encode, mapped onto a constant rate factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityTier {
    /// No CRF; the encoder targets a fixed bitrate instead.
    ConstantBitrate,
    Lossless,
    #[default]
    PerceptuallyLossless,
    High,
    Medium,
    Low,
    VeryLow,
    Lowest,
}

impl QualityTier {
    /// Constant rate factor for the tier, `None` for constant bitrate.
    #[must_use]
    pub fn crf(self) -> Option<u8> {
        match self {
            QualityTier::ConstantBitrate => None,
            QualityTier::Lossless => Some(0),
            QualityTier::PerceptuallyLossless => Some(17),
            QualityTier::High => Some(20),
            QualityTier::Medium => Some(23),
            QualityTier::Low => Some(26),
            QualityTier::VeryLow => Some(29),
            QualityTier::Lowest => Some(32),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityTier::ConstantBitrate => "none",
            QualityTier::Lossless => "lossless",
            QualityTier::PerceptuallyLossless => "perc-lossless",
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
            QualityTier::VeryLow => "verylow",
            QualityTier::Lowest => "lowest",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "none" | "cbr" | "constant-bitrate" => Ok(QualityTier::ConstantBitrate),
            "lossless" => Ok(QualityTier::Lossless),
            "perc-lossless" | "perceptually-lossless" => Ok(QualityTier::PerceptuallyLossless),
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            "verylow" | "very-low" => Ok(QualityTier::VeryLow),
            "lowest" => Ok(QualityTier::Lowest),
            other => Err(CoreError::Config(format!(
                "unknown quality '{other}' (expected none, lossless, perc-lossless, high, medium, low, verylow or lowest)"
            ))),
        }
    }
}

/// Tradeoff between encoding speed and compression ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingSpeed {
    #[default]
    Best,
    Good,
    Realtime,
}

impl EncodingSpeed {
    /// libx264 `-preset` value.
    #[must_use]
    pub fn x264_preset(self) -> &'static str {
        match self {
            EncodingSpeed::Best => "slower",
            EncodingSpeed::Good => "medium",
            EncodingSpeed::Realtime => "superfast",
        }
    }

    /// libvpx `-deadline` value.
    #[must_use]
    pub fn vpx_deadline(self) -> &'static str {
        match self {
            EncodingSpeed::Best => "best",
            EncodingSpeed::Good => "good",
            EncodingSpeed::Realtime => "realtime",
        }
    }
}

impl fmt::Display for EncodingSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vpx_deadline())
    }
}

impl FromStr for EncodingSpeed {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(EncodingSpeed::Best),
            "good" => Ok(EncodingSpeed::Good),
            "realtime" => Ok(EncodingSpeed::Realtime),
            other => Err(CoreError::Config(format!(
                "unknown encoding speed '{other}' (expected best, good or realtime)"
            ))),
        }
    }
}

/// Settings for one conversion.
///
/// Immutable for the duration of a conversion. Built either directly or
/// through [`EncodingConfigBuilder`].
///
/// # Examples
///
/// ```rust
/// use seqvid_core::config::{Container, EncodingConfigBuilder, QualityTier};
///
/// let config = EncodingConfigBuilder::new()
///     .source_dir("//renders/shot_010")
///     .container(Container::Matroska)
///     .quality(QualityTier::High)
///     .frame_rate(30)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EncodingConfig {
    /// Directory holding the image sequence, possibly `//`-relative
    pub source_dir: PathBuf,

    /// Output container
    pub container: Container,

    /// Quality tier (CRF or constant bitrate)
    pub quality: QualityTier,

    /// Encoder speed/compression tradeoff
    pub speed: EncodingSpeed,

    /// Root used to resolve `//`-prefixed and relative source directories
    pub project_root: PathBuf,

    /// Directory under which ephemeral render contexts are created
    pub work_root: PathBuf,

    /// Frames per second of the produced video
    pub frame_rate: u32,

    /// Bitrate in kbit/s for constant-bitrate output
    pub bitrate_kbps: u32,

    /// Base name for the ephemeral render context
    pub context_base_name: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(PROJECT_RELATIVE_PREFIX),
            container: Container::default(),
            quality: QualityTier::default(),
            speed: EncodingSpeed::default(),
            project_root: PathBuf::from("."),
            work_root: default_work_root(),
            frame_rate: DEFAULT_FRAME_RATE,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            context_base_name: DEFAULT_CONTEXT_BASE_NAME.to_string(),
        }
    }
}

impl EncodingConfig {
    /// Creates a configuration for `source_dir` with default encoding settings.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Self::default()
        }
    }

    /// Checks the ambient settings for values the encoder cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.frame_rate == 0 {
            return Err(CoreError::Config("frame rate must be greater than zero".into()));
        }
        if self.quality == QualityTier::ConstantBitrate && self.bitrate_kbps == 0 {
            return Err(CoreError::Config(
                "bitrate must be greater than zero for constant bitrate output".into(),
            ));
        }
        if self.context_base_name.trim().is_empty() {
            return Err(CoreError::Config("render context base name is empty".into()));
        }
        Ok(())
    }

    /// The source directory with the project-root convention applied.
    #[must_use]
    pub fn resolved_source_dir(&self) -> PathBuf {
        resolve_source_dir(&self.source_dir, &self.project_root)
    }
}

/// Default location for ephemeral render contexts.
#[must_use]
pub fn default_work_root() -> PathBuf {
    std::env::temp_dir().join("seqvid")
}

/// Resolves a user supplied directory against the project root.
///
/// `//name` and plain relative paths are joined onto `project_root`; absolute
/// paths are returned unchanged.
#[must_use]
pub fn resolve_source_dir(path: &Path, project_root: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix(PROJECT_RELATIVE_PREFIX) {
        return project_root.join(rest);
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_parsing_accepts_host_names_and_aliases() {
        assert_eq!("mpeg4".parse::<Container>().unwrap(), Container::Mpeg4);
        assert_eq!("MP4".parse::<Container>().unwrap(), Container::Mpeg4);
        assert_eq!("matroska".parse::<Container>().unwrap(), Container::Matroska);
        assert_eq!("flv".parse::<Container>().unwrap(), Container::Flash);
        assert_eq!("webm".parse::<Container>().unwrap(), Container::WebM);
        assert!("mov".parse::<Container>().is_err());
    }

    #[test]
    fn test_container_extensions_and_codecs() {
        assert_eq!(Container::Mpeg4.extension(), "mp4");
        assert_eq!(Container::Flash.extension(), "flv");
        assert_eq!(Container::Matroska.muxer(), "matroska");
        assert_eq!(Container::Avi.video_codec(), "libx264");
        assert_eq!(Container::WebM.video_codec(), "libvpx-vp9");
    }

    #[test]
    fn test_quality_crf_mapping() {
        assert_eq!(QualityTier::ConstantBitrate.crf(), None);
        assert_eq!(QualityTier::Lossless.crf(), Some(0));
        assert_eq!(QualityTier::PerceptuallyLossless.crf(), Some(17));
        assert_eq!(QualityTier::Lowest.crf(), Some(32));
        assert_eq!("perc_lossless".parse::<QualityTier>().unwrap(), QualityTier::PerceptuallyLossless);
        assert_eq!("VERYLOW".parse::<QualityTier>().unwrap(), QualityTier::VeryLow);
        assert_eq!(QualityTier::VeryLow.to_string(), "verylow");
    }

    #[test]
    fn test_speed_mapping() {
        assert_eq!(EncodingSpeed::Best.x264_preset(), "slower");
        assert_eq!(EncodingSpeed::Realtime.vpx_deadline(), "realtime");
        assert_eq!("Good".parse::<EncodingSpeed>().unwrap(), EncodingSpeed::Good);
        assert!("fast".parse::<EncodingSpeed>().is_err());
    }

    #[test]
    fn test_resolve_source_dir() {
        let root = Path::new("/projects/film");
        assert_eq!(
            resolve_source_dir(Path::new("//renders/shot"), root),
            PathBuf::from("/projects/film/renders/shot")
        );
        assert_eq!(
            resolve_source_dir(Path::new("renders"), root),
            PathBuf::from("/projects/film/renders")
        );
        assert_eq!(
            resolve_source_dir(Path::new("/tmp/frames"), root),
            PathBuf::from("/tmp/frames")
        );
    }

    #[test]
    fn test_default_source_is_project_root() {
        let config = EncodingConfig {
            project_root: PathBuf::from("/projects/film"),
            ..EncodingConfig::default()
        };
        assert_eq!(config.source_dir, PathBuf::from(PROJECT_RELATIVE_PREFIX));
        assert_eq!(config.resolved_source_dir(), PathBuf::from("/projects/film"));
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = EncodingConfig::new("/tmp");
        assert!(config.validate().is_ok());

        config.frame_rate = 0;
        assert!(config.validate().is_err());

        config.frame_rate = 24;
        config.quality = QualityTier::ConstantBitrate;
        config.bitrate_kbps = 0;
        assert!(config.validate().is_err());
    }
}
