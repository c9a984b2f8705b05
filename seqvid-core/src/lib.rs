//! Core library for converting numbered image sequences into video files.
//!
//! A directory of frames such as `shot_1.png, shot_3.png, shot_2.png` is
//! collected, ordered by frame number, given canonical four-digit names and
//! handed to a [`host::Host`] that places it as a strip and renders it to a
//! single video. [`host::FfmpegHost`] is the bundled host; it renders with
//! ffmpeg and reads image sizes with ffprobe.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use seqvid_core::{EncodingConfig, convert_sequence};
//! use seqvid_core::config::{Container, QualityTier};
//! use seqvid_core::host::FfmpegHost;
//!
//! let mut config = EncodingConfig::new("/renders/shot_010");
//! config.container = Container::WebM;
//! config.quality = QualityTier::High;
//! config.validate().unwrap();
//!
//! let mut host = FfmpegHost::new(config.work_root.clone()).show_progress(true);
//! let outcome = convert_sequence(&mut host, &config).unwrap();
//! println!("{} ({})", outcome.message(), outcome.status_code());
//! ```
//!
//! Listing the frames without rendering:
//!
//! ```rust,no_run
//! let files = seqvid_core::find_image_files(std::path::Path::new("/renders/shot_010")).unwrap();
//! println!("{} frame(s)", files.len());
//! ```

pub mod config;
pub mod conversion;
pub mod discovery;
pub mod error;
pub mod external;
pub mod host;
pub mod sequence;
pub mod utils;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// Re-exports for public API
pub use config::{EncodingConfig, EncodingConfigBuilder};
pub use conversion::{ConversionOutcome, ConversionReport, convert_sequence, plan_sequence};
pub use discovery::find_image_files;
pub use error::{CoreError, CoreResult};
pub use sequence::ImageSequence;
pub use utils::{format_bytes, format_duration};
