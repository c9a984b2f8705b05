// ============================================================================
// seqvid-core/src/host/ffmpeg_host.rs
// ============================================================================
//
// FFMPEG HOST: A Host Backed by Staging Directories and the ffmpeg CLI
//
// Work contexts are directories under a work root. The user's own context is
// the primary context "main", which has no directory and can never be
// removed. An image strip placed in a context is written as an ffconcat list
// when the context is rendered, and the render itself is one ffmpeg run
// driven through an injected FfmpegSpawner.
//
// Progress is shown with an indicatif bar while the area mode is Sequencer
// and progress display is enabled.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use super::{AreaMode, ContextId, Dimensions, Host, ImageStrip, RenderSettings};
use crate::error::{CoreError, CoreResult};
use crate::external::{
    FfmpegProcess, FfmpegSpawner, SidecarSpawner, build_encode_command, probe_image_dimensions,
    write_concat_list,
};

/// Name of the user's own context.
pub const PRIMARY_CONTEXT_NAME: &str = "main";

/// File name of the ffconcat list written into a context directory.
pub const STRIP_LIST_FILE: &str = "strip.ffconcat";

/// Number of ffmpeg error lines kept for the failure message.
const MAX_ERROR_LINES: usize = 8;

#[derive(Debug)]
struct ContextState {
    dir: PathBuf,
    strip: Option<ImageStrip>,
}

/// Host that renders with the ffmpeg command line tool.
///
/// # Examples
///
/// ```rust,no_run
/// use seqvid_core::host::FfmpegHost;
/// use seqvid_core::{EncodingConfig, convert_sequence};
///
/// let config = EncodingConfig::new("/renders/shot_010");
/// let mut host = FfmpegHost::new(&config.work_root);
/// let outcome = convert_sequence(&mut host, &config)?;
/// println!("{}", outcome.message());
/// # Ok::<(), seqvid_core::CoreError>(())
/// ```
pub struct FfmpegHost<S: FfmpegSpawner = SidecarSpawner> {
    spawner: S,
    work_root: PathBuf,
    active: ContextId,
    area_mode: AreaMode,
    contexts: BTreeMap<ContextId, ContextState>,
    show_progress: bool,
}

impl FfmpegHost<SidecarSpawner> {
    /// Creates a host spawning the system ffmpeg, with contexts under `work_root`.
    pub fn new(work_root: impl Into<PathBuf>) -> Self {
        Self::with_spawner(work_root, SidecarSpawner)
    }
}

impl<S: FfmpegSpawner> FfmpegHost<S> {
    /// Creates a host using `spawner` to run ffmpeg.
    pub fn with_spawner(work_root: impl Into<PathBuf>, spawner: S) -> Self {
        Self {
            spawner,
            work_root: work_root.into(),
            active: ContextId::new(PRIMARY_CONTEXT_NAME),
            area_mode: AreaMode::Default,
            contexts: BTreeMap::new(),
            show_progress: true,
        }
    }

    /// Enables or disables the progress bar during renders.
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn is_primary(context: &ContextId) -> bool {
        context.name() == PRIMARY_CONTEXT_NAME
    }

    fn state(&self, context: &ContextId) -> CoreResult<&ContextState> {
        self.contexts
            .get(context)
            .ok_or_else(|| CoreError::UnknownContext(context.to_string()))
    }

    fn progress_bar(&self, frames: u32) -> ProgressBar {
        if !self.show_progress || self.area_mode != AreaMode::Sequencer {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(u64::from(frames));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");
        bar.set_style(style);
        bar.set_message("Encoding");
        bar
    }
}

impl<S: FfmpegSpawner> Host for FfmpegHost<S> {
    fn active_context(&self) -> ContextId {
        self.active.clone()
    }

    fn set_active_context(&mut self, context: &ContextId) -> CoreResult<()> {
        if !Self::is_primary(context) && !self.contexts.contains_key(context) {
            return Err(CoreError::UnknownContext(context.to_string()));
        }
        debug!("Active context: {} -> {}", self.active, context);
        self.active = context.clone();
        Ok(())
    }

    fn area_mode(&self) -> AreaMode {
        self.area_mode
    }

    fn set_area_mode(&mut self, mode: AreaMode) {
        self.area_mode = mode;
    }

    fn context_exists(&self, name: &str) -> bool {
        let id = ContextId::new(name);
        Self::is_primary(&id)
            || self.contexts.contains_key(&id)
            || self.work_root.join(name).exists()
    }

    fn create_context(&mut self, name: &str) -> CoreResult<ContextId> {
        if self.context_exists(name) {
            return Err(CoreError::ContextExists(name.to_string()));
        }
        fs::create_dir_all(&self.work_root)?;
        let dir = self.work_root.join(name);
        fs::create_dir(&dir)?;

        let id = ContextId::new(name);
        debug!("Created context '{}' at {}", id, dir.display());
        self.contexts.insert(id.clone(), ContextState { dir, strip: None });
        Ok(id)
    }

    fn remove_context(&mut self, context: &ContextId) -> CoreResult<()> {
        if Self::is_primary(context) {
            return Err(CoreError::Config("the primary context cannot be removed".into()));
        }
        let state = self
            .contexts
            .remove(context)
            .ok_or_else(|| CoreError::UnknownContext(context.to_string()))?;
        if self.active == *context {
            self.active = ContextId::new(PRIMARY_CONTEXT_NAME);
        }
        if state.dir.exists() {
            fs::remove_dir_all(&state.dir)?;
        }
        debug!("Removed context '{}'", context);
        Ok(())
    }

    fn image_dimensions(&self, path: &Path) -> CoreResult<Dimensions> {
        probe_image_dimensions(path)
    }

    fn add_image_strip(&mut self, context: &ContextId, strip: &ImageStrip) -> CoreResult<()> {
        if let Some(missing) = strip.files.iter().find(|f| !f.is_file()) {
            return Err(CoreError::PathError(format!(
                "Strip image does not exist: {}",
                missing.display()
            )));
        }
        let state = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| CoreError::UnknownContext(context.to_string()))?;
        if state.strip.is_some() {
            warn!("Replacing existing strip in context '{}'", context);
        }
        debug!(
            "Strip with {} image(s) on frames {}..={} in context '{}'",
            strip.files.len(),
            strip.frame_start,
            strip.frame_end,
            context
        );
        state.strip = Some(strip.clone());
        Ok(())
    }

    fn render(&mut self, context: &ContextId, settings: &RenderSettings) -> CoreResult<PathBuf> {
        let state = self.state(context)?;
        let strip = state
            .strip
            .as_ref()
            .ok_or_else(|| CoreError::NoImageStrip(context.to_string()))?;

        let available = u32::try_from(strip.files.len()).unwrap_or(u32::MAX);
        if settings.frame_start < 1
            || settings.frame_end < settings.frame_start
            || settings.frame_end > available
        {
            return Err(CoreError::FrameRange {
                start: settings.frame_start,
                end: settings.frame_end,
                available,
            });
        }

        let list_path = state.dir.join(STRIP_LIST_FILE);
        write_concat_list(&list_path, &strip.files)?;

        let cmd = build_encode_command(&list_path, settings);
        info!(
            target: "seqvid::progress",
            "Encoding {} frame(s) at {} to {}",
            settings.frame_count(),
            settings.resolution,
            settings.output_file().display()
        );

        let bar = self.progress_bar(settings.frame_count());
        let mut process = self
            .spawner
            .spawn(cmd)
            .map_err(|e| CoreError::HostEncodeFailure(e.to_string()))?;

        let mut error_lines: Vec<String> = Vec::new();
        let events = process.handle_events(|event| {
            match event {
                FfmpegEvent::Progress(progress) => bar.set_position(u64::from(progress.frame)),
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                    debug!("ffmpeg: {}", line);
                    error_lines.push(line);
                }
                FfmpegEvent::Error(line) => error_lines.push(line),
                _ => {}
            }
            Ok(())
        });

        // The child is reaped and the bar cleared even when reading events failed.
        let waited = process.wait();
        bar.finish_and_clear();
        events?;
        let status = waited?;

        if !status.success() {
            let start = error_lines.len().saturating_sub(MAX_ERROR_LINES);
            let detail = error_lines[start..].join("; ");
            return Err(CoreError::HostEncodeFailure(format!(
                "ffmpeg exited with {status}: {detail}"
            )));
        }

        Ok(settings.output_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Container, EncodingSpeed, QualityTier};
    use crate::mocks::MockFfmpegSpawner;
    use tempfile::tempdir;

    fn write_frames(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"not really an image").unwrap();
                path
            })
            .collect()
    }

    fn settings(output: PathBuf, frames: u32) -> RenderSettings {
        RenderSettings {
            container: Container::Mpeg4,
            quality: QualityTier::High,
            speed: EncodingSpeed::Good,
            resolution: Dimensions { width: 320, height: 240 },
            frame_start: 1,
            frame_end: frames,
            output_path: output,
            samples: 1,
            frame_rate: 24,
            bitrate_kbps: 6000,
        }
    }

    #[test]
    fn test_contexts_are_directories_under_work_root() {
        let work = tempdir().unwrap();
        let mut host = FfmpegHost::with_spawner(work.path(), MockFfmpegSpawner::new());

        assert!(host.context_exists(PRIMARY_CONTEXT_NAME));
        assert!(!host.context_exists("img2vid"));

        let ctx = host.create_context("img2vid").unwrap();
        assert!(work.path().join("img2vid").is_dir());
        assert!(host.context_exists("img2vid"));
        assert!(matches!(host.create_context("img2vid"), Err(CoreError::ContextExists(_))));

        host.set_active_context(&ctx).unwrap();
        assert_eq!(host.active_context(), ctx);

        host.remove_context(&ctx).unwrap();
        assert!(!work.path().join("img2vid").exists());
        assert_eq!(host.active_context().name(), PRIMARY_CONTEXT_NAME);
    }

    #[test]
    fn test_leftover_directory_counts_as_taken() {
        let work = tempdir().unwrap();
        fs::create_dir(work.path().join("img2vid")).unwrap();
        let host = FfmpegHost::with_spawner(work.path(), MockFfmpegSpawner::new());
        assert!(host.context_exists("img2vid"));
        assert_eq!(crate::host::unique_context_name(&host, "img2vid"), "img2vid2");
    }

    #[test]
    fn test_unknown_and_primary_context_errors() {
        let work = tempdir().unwrap();
        let mut host = FfmpegHost::with_spawner(work.path(), MockFfmpegSpawner::new());
        let ghost = ContextId::new("ghost");

        assert!(matches!(host.set_active_context(&ghost), Err(CoreError::UnknownContext(_))));
        assert!(matches!(host.remove_context(&ghost), Err(CoreError::UnknownContext(_))));
        assert!(host.remove_context(&ContextId::new(PRIMARY_CONTEXT_NAME)).is_err());
    }

    #[test]
    fn test_render_writes_strip_and_spawns_ffmpeg() {
        let work = tempdir().unwrap();
        let frames_dir = tempdir().unwrap();
        let files = write_frames(frames_dir.path(), &["shot_1.png", "shot_2.png"]);

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("strip.ffconcat", Vec::new(), true);
        let mut host = FfmpegHost::with_spawner(work.path(), spawner.clone()).show_progress(false);

        let ctx = host.create_context("img2vid").unwrap();
        host.add_image_strip(
            &ctx,
            &ImageStrip {
                directory: frames_dir.path().to_path_buf(),
                files: files.clone(),
                frame_start: 1,
                frame_end: 2,
            },
        )
        .unwrap();

        let output = host
            .render(&ctx, &settings(frames_dir.path().join("shot"), 2))
            .unwrap();
        assert_eq!(output, frames_dir.path().join("shot.mp4"));
        assert!(output.is_file());

        let list = fs::read_to_string(work.path().join("img2vid").join(STRIP_LIST_FILE)).unwrap();
        assert_eq!(list.lines().count(), 3);
        assert!(list.contains("shot_2.png"));

        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].iter().any(|a| a == "libx264"));
    }

    #[test]
    fn test_render_failure_is_a_host_encode_failure() {
        let work = tempdir().unwrap();
        let frames_dir = tempdir().unwrap();
        let files = write_frames(frames_dir.path(), &["a_1.png"]);

        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation(
            "strip.ffconcat",
            vec![FfmpegEvent::Log(
                LogLevel::Error,
                "width not divisible by 2".to_string(),
            )],
            1,
        );
        let mut host = FfmpegHost::with_spawner(work.path(), spawner).show_progress(false);
        let ctx = host.create_context("img2vid").unwrap();
        host.add_image_strip(
            &ctx,
            &ImageStrip {
                directory: frames_dir.path().to_path_buf(),
                files,
                frame_start: 1,
                frame_end: 1,
            },
        )
        .unwrap();

        let err = host
            .render(&ctx, &settings(frames_dir.path().join("a"), 1))
            .unwrap_err();
        match err {
            CoreError::HostEncodeFailure(msg) => assert!(msg.contains("width not divisible by 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_waits_for_ffmpeg_when_events_fail() {
        let work = tempdir().unwrap();
        let frames_dir = tempdir().unwrap();
        let files = write_frames(frames_dir.path(), &["a_1.png"]);

        let spawner = MockFfmpegSpawner::new();
        spawner.add_events_error_expectation("strip.ffconcat", "stderr pipe closed");
        let mut host = FfmpegHost::with_spawner(work.path(), spawner.clone()).show_progress(false);
        let ctx = host.create_context("img2vid").unwrap();
        host.add_image_strip(
            &ctx,
            &ImageStrip {
                directory: frames_dir.path().to_path_buf(),
                files,
                frame_start: 1,
                frame_end: 1,
            },
        )
        .unwrap();

        let err = host
            .render(&ctx, &settings(frames_dir.path().join("a"), 1))
            .unwrap_err();
        assert!(err.to_string().contains("stderr pipe closed"));
        assert_eq!(spawner.wait_count(), 1);
    }

    #[test]
    fn test_render_rejects_missing_strip_and_bad_range() {
        let work = tempdir().unwrap();
        let frames_dir = tempdir().unwrap();
        let files = write_frames(frames_dir.path(), &["a_1.png"]);
        let mut host = FfmpegHost::with_spawner(work.path(), MockFfmpegSpawner::new());
        let ctx = host.create_context("img2vid").unwrap();

        let out = frames_dir.path().join("a");
        assert!(matches!(
            host.render(&ctx, &settings(out.clone(), 1)),
            Err(CoreError::NoImageStrip(_))
        ));

        host.add_image_strip(
            &ctx,
            &ImageStrip {
                directory: frames_dir.path().to_path_buf(),
                files,
                frame_start: 1,
                frame_end: 1,
            },
        )
        .unwrap();
        assert!(matches!(
            host.render(&ctx, &settings(out, 5)),
            Err(CoreError::FrameRange { available: 1, .. })
        ));
    }

    #[test]
    fn test_add_strip_rejects_missing_files() {
        let work = tempdir().unwrap();
        let mut host = FfmpegHost::with_spawner(work.path(), MockFfmpegSpawner::new());
        let ctx = host.create_context("img2vid").unwrap();
        let result = host.add_image_strip(
            &ctx,
            &ImageStrip {
                directory: work.path().to_path_buf(),
                files: vec![work.path().join("missing_1.png")],
                frame_start: 1,
                frame_end: 1,
            },
        );
        assert!(matches!(result, Err(CoreError::PathError(_))));
    }
}
