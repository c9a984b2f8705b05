// ============================================================================
// seqvid-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for EncodingConfig
//
// This module implements the builder pattern for the EncodingConfig structure,
// providing a fluent API for creating conversion settings. Every field has a
// default, so a builder with only `source_dir` set is already usable.
//
// KEY COMPONENTS:
// - EncodingConfigBuilder: Builder struct for creating EncodingConfig instances

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{Container, EncodingConfig, EncodingSpeed, QualityTier};

/// Builder for creating [`EncodingConfig`] instances.
///
/// # Examples
///
/// ```rust
/// use seqvid_core::config::{EncodingConfigBuilder, EncodingSpeed};
///
/// let config = EncodingConfigBuilder::new()
///     .source_dir("/renders/shot_020")
///     .speed(EncodingSpeed::Realtime)
///     .work_root("/tmp/seqvid-work")
///     .build();
/// assert_eq!(config.frame_rate, 24);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodingConfigBuilder {
    config: EncodingConfig,
}

impl EncodingConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory holding the image sequence.
    pub fn source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = source_dir.into();
        self
    }

    /// Sets the output container.
    pub fn container(mut self, container: Container) -> Self {
        self.config.container = container;
        self
    }

    /// Sets the quality tier.
    pub fn quality(mut self, quality: QualityTier) -> Self {
        self.config.quality = quality;
        self
    }

    /// Sets the speed/compression tradeoff.
    pub fn speed(mut self, speed: EncodingSpeed) -> Self {
        self.config.speed = speed;
        self
    }

    /// Sets the root that `//`-prefixed and relative source paths resolve against.
    pub fn project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.config.project_root = project_root.into();
        self
    }

    /// Sets the directory under which ephemeral render contexts are created.
    pub fn work_root(mut self, work_root: impl Into<PathBuf>) -> Self {
        self.config.work_root = work_root.into();
        self
    }

    /// Sets the output frame rate.
    pub fn frame_rate(mut self, frame_rate: u32) -> Self {
        self.config.frame_rate = frame_rate;
        self
    }

    /// Sets the bitrate (kbit/s) used for constant bitrate output.
    pub fn bitrate_kbps(mut self, bitrate_kbps: u32) -> Self {
        self.config.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Sets the base name of the ephemeral render context.
    pub fn context_base_name(mut self, name: impl Into<String>) -> Self {
        self.config.context_base_name = name.into();
        self
    }

    /// Builds the configuration. Call [`EncodingConfig::validate`] before use.
    pub fn build(self) -> EncodingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BITRATE_KBPS, DEFAULT_CONTEXT_BASE_NAME};

    #[test]
    fn test_builder_defaults() {
        let config = EncodingConfigBuilder::new().source_dir("/frames").build();
        assert_eq!(config.source_dir, PathBuf::from("/frames"));
        assert_eq!(config.container, Container::Mpeg4);
        assert_eq!(config.quality, QualityTier::PerceptuallyLossless);
        assert_eq!(config.speed, EncodingSpeed::Best);
        assert_eq!(config.bitrate_kbps, DEFAULT_BITRATE_KBPS);
        assert_eq!(config.context_base_name, DEFAULT_CONTEXT_BASE_NAME);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EncodingConfigBuilder::new()
            .source_dir("//shots")
            .project_root("/proj")
            .container(Container::WebM)
            .quality(QualityTier::Low)
            .speed(EncodingSpeed::Good)
            .frame_rate(30)
            .bitrate_kbps(2500)
            .context_base_name("convert")
            .build();

        assert_eq!(config.resolved_source_dir(), PathBuf::from("/proj/shots"));
        assert_eq!(config.container, Container::WebM);
        assert_eq!(config.quality, QualityTier::Low);
        assert_eq!(config.speed, EncodingSpeed::Good);
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.bitrate_kbps, 2500);
        assert_eq!(config.context_base_name, "convert");
    }
}
