// ============================================================================
// seqvid-core/src/conversion.rs
// ============================================================================
//
// CONVERSION: Image Sequence to Video, End to End
//
// The conversion borrows a Host for the duration of one call:
//
//   capture host state -> create ephemeral context -> collect -> sort ->
//   configure strip and render settings -> render -> restore host state
//
// Restoration lives in a Drop guard armed right after the ephemeral context
// is created, so the user's active context and area mode come back and the
// ephemeral context is destroyed on every exit path: early "no files" and
// "no directory" outcomes, propagated errors and unwinding panics alike. If
// the context cannot be created nothing has changed yet and nothing is
// restored.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use serde::Serialize;

use crate::config::{Container, EncodingConfig, EncodingSpeed, QualityTier};
use crate::discovery::find_image_files;
use crate::error::{CoreError, CoreResult};
use crate::host::{
    AreaMode, ContextId, Dimensions, Host, ImageStrip, RenderSettings, unique_context_name,
};
use crate::sequence::ImageSequence;
use crate::utils::sequence_duration;

/// Render samples per frame. The frames are finished images, so one is enough.
pub const RENDER_SAMPLES: u32 = 1;

/// Summary of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub frame_count: usize,
    pub frame_range: (u32, u32),
    pub resolution: Dimensions,
    pub container: Container,
    pub quality: QualityTier,
    pub speed: EncodingSpeed,
    pub frame_rate: u32,
    pub canonical_names: Vec<String>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Local completion time, RFC 3339.
    pub finished_at: String,
}

impl ConversionReport {
    /// Playback length of the written video in seconds.
    #[must_use]
    pub fn video_length_secs(&self) -> f64 {
        sequence_duration(self.frame_count, self.frame_rate)
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// How a conversion ended.
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    /// The video was written.
    Done(ConversionReport),
    /// The directory holds no supported images.
    NoFilesFound,
    /// The directory does not exist.
    LocationNotFound,
}

impl ConversionOutcome {
    /// Status code: 0 done, 1 no files found, 2 location not found.
    #[must_use]
    pub fn status_code(&self) -> i32 {
        match self {
            ConversionOutcome::Done(_) => 0,
            ConversionOutcome::NoFilesFound => 1,
            ConversionOutcome::LocationNotFound => 2,
        }
    }

    /// The user-facing status message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ConversionOutcome::Done(_) => "Done",
            ConversionOutcome::NoFilesFound => "No files found at the location",
            ConversionOutcome::LocationNotFound => "Location not found",
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Done(_))
    }

    #[must_use]
    pub fn report(&self) -> Option<&ConversionReport> {
        match self {
            ConversionOutcome::Done(report) => Some(report),
            _ => None,
        }
    }
}

/// Host state captured before a conversion, restored when dropped.
///
/// Restoration order is area mode, active context, then removal of the
/// ephemeral context. Failures while restoring are logged; the first one is
/// returned by [`HostStateGuard::restore`].
pub struct HostStateGuard<'h, H: Host + ?Sized> {
    host: &'h mut H,
    previous_context: ContextId,
    previous_mode: AreaMode,
    ephemeral: ContextId,
    restored: bool,
}

impl<'h, H: Host + ?Sized> HostStateGuard<'h, H> {
    /// Captures the host state, then creates and activates an ephemeral context.
    ///
    /// On error the host is left as it was.
    pub fn enter(host: &'h mut H, base_name: &str) -> CoreResult<Self> {
        let previous_context = host.active_context();
        let previous_mode = host.area_mode();

        let name = unique_context_name(&*host, base_name);
        let ephemeral = host.create_context(&name)?;
        debug!("Ephemeral context '{}' created", ephemeral);

        let guard = Self {
            host,
            previous_context,
            previous_mode,
            ephemeral,
            restored: false,
        };
        guard.host.set_active_context(&guard.ephemeral)?;
        guard.host.set_area_mode(AreaMode::Sequencer);
        Ok(guard)
    }

    /// The host, for use while the guard is held.
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// The ephemeral context created by [`HostStateGuard::enter`].
    #[must_use]
    pub fn context(&self) -> &ContextId {
        &self.ephemeral
    }

    /// Restores the host now instead of on drop.
    pub fn restore(mut self) -> CoreResult<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> CoreResult<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        self.host.set_area_mode(self.previous_mode);
        let reactivated = self.host.set_active_context(&self.previous_context);
        if let Err(e) = &reactivated {
            error!("Failed to reactivate context '{}': {}", self.previous_context, e);
        }
        let removed = self.host.remove_context(&self.ephemeral);
        if let Err(e) = &removed {
            error!("Failed to remove ephemeral context '{}': {}", self.ephemeral, e);
        }
        debug!("Host state restored to context '{}'", self.previous_context);
        reactivated.and(removed)
    }
}

impl<H: Host + ?Sized> Drop for HostStateGuard<'_, H> {
    fn drop(&mut self) {
        let _ = self.restore_inner();
    }
}

/// Collects and orders the sequence described by `config` without touching a host.
///
/// Returns [`CoreError::DirectoryNotFound`] or [`CoreError::EmptySequence`]
/// for the two early-exit cases.
pub fn plan_sequence(config: &EncodingConfig) -> CoreResult<ImageSequence> {
    let source_dir = config.resolved_source_dir();
    let files = find_image_files(&source_dir)?;
    ImageSequence::from_files(&source_dir, &files)
}

/// Converts the image sequence described by `config` into one video file.
///
/// The two early exits come back as [`ConversionOutcome::NoFilesFound`] and
/// [`ConversionOutcome::LocationNotFound`]. A non-numeric frame token or a
/// failed encode is returned as an error. The host is restored either way.
pub fn convert_sequence<H: Host + ?Sized>(
    host: &mut H,
    config: &EncodingConfig,
) -> CoreResult<ConversionOutcome> {
    config.validate()?;
    let started = Instant::now();

    let mut guard = HostStateGuard::enter(host, &config.context_base_name)?;

    let sequence = match plan_sequence(config) {
        Ok(sequence) => sequence,
        Err(CoreError::DirectoryNotFound(dir)) => {
            info!("Location not found: {}", dir.display());
            guard.restore()?;
            return Ok(ConversionOutcome::LocationNotFound);
        }
        Err(CoreError::EmptySequence(dir)) => {
            info!("No files found at the location: {}", dir.display());
            guard.restore()?;
            return Ok(ConversionOutcome::NoFilesFound);
        }
        Err(e) => return Err(e),
    };

    let context = guard.context().clone();
    let settings = configure(guard.host(), &context, &sequence, config)?;

    info!(
        target: "seqvid::progress",
        "Rendering {} frame(s) from {}",
        sequence.len(),
        sequence.directory.display()
    );
    let output_path = guard.host().render(&context, &settings)?;
    guard.restore()?;

    let report = ConversionReport {
        output_path,
        frame_count: sequence.len(),
        frame_range: (settings.frame_start, settings.frame_end),
        resolution: settings.resolution,
        container: settings.container,
        quality: settings.quality,
        speed: settings.speed,
        frame_rate: settings.frame_rate,
        canonical_names: sequence.canonical_names(),
        elapsed: started.elapsed(),
        finished_at: chrono::Local::now().to_rfc3339(),
    };
    info!("Wrote {}", report.output_path.display());
    Ok(ConversionOutcome::Done(report))
}

/// Places the strip in `context` and derives the render settings.
fn configure<H: Host + ?Sized>(
    host: &mut H,
    context: &ContextId,
    sequence: &ImageSequence,
    config: &EncodingConfig,
) -> CoreResult<RenderSettings> {
    let (frame_start, frame_end) = sequence.frame_range();
    let strip = ImageStrip {
        directory: sequence.directory.clone(),
        files: sequence.source_paths(),
        frame_start,
        frame_end,
    };
    host.add_image_strip(context, &strip)?;

    let first = sequence
        .first()
        .ok_or_else(|| CoreError::EmptySequence(sequence.directory.clone()))?;
    let resolution = host.image_dimensions(&first.source)?;
    debug!("Resolution from {}: {}", first.canonical_name, resolution);

    Ok(RenderSettings {
        container: config.container,
        quality: config.quality,
        speed: config.speed,
        resolution,
        frame_start,
        frame_end,
        output_path: sequence.directory.join(sequence.output_stem()),
        samples: RENDER_SAMPLES,
        frame_rate: config.frame_rate,
        bitrate_kbps: config.bitrate_kbps,
    })
}
