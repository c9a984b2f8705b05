// seqvid-core/src/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and, through the "test-mocks" feature, for
// integration tests.

use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegProcess, FfmpegSpawner};
use crate::host::{AreaMode, ContextId, Dimensions, Host, ImageStrip, RenderSettings};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

// ---------------------------------------------------------------------------
// ffmpeg spawner
// ---------------------------------------------------------------------------

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
    /// Error returned by handle_events after the events were emitted.
    pub events_error: Option<String>,
    /// Shared count of wait calls.
    pub waits: Rc<Cell<usize>>,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        match &self.events_error {
            Some(message) => Err(CoreError::Io(std::io::Error::other(message.clone()))),
            None => Ok(()),
        }
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.waits.set(self.waits.get() + 1);
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// A command matches the first expectation whose pattern is contained in any
/// of its arguments. Unmatched commands panic.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
    waits: Rc<Cell<usize>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = self.process(events, exit_status(0));
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = self.process(events, exit_status(exit_code));
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    /// Expects a command whose event stream breaks off with `message`.
    pub fn add_events_error_expectation(&self, arg_pattern: &str, message: &str) {
        let mut process = self.process(Vec::new(), exit_status(1));
        process.events_error = Some(message.to_string());
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    fn process(&self, events: Vec<FfmpegEvent>, exit_status: ExitStatus) -> MockFfmpegProcess {
        MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status,
            events_error: None,
            waits: Rc::clone(&self.waits),
        }
    }

    /// Number of times a spawned process was waited on.
    pub fn wait_count(&self) -> usize {
        self.waits.get()
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        if expectation.create_dummy_output && expectation.result.is_ok() {
            if let Some(output_path) = args.last().map(PathBuf::from) {
                if let Some(parent) = output_path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                if let Err(e) = std::fs::File::create(&output_path) {
                    log::error!(
                        "MockFfmpegSpawner failed to create dummy output file {:?}: {}",
                        output_path,
                        e
                    );
                }
            }
        }
        expectation.result
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// A call made against [`MockHost`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetActiveContext(ContextId),
    SetAreaMode(AreaMode),
    CreateContext(String),
    RemoveContext(ContextId),
    ImageDimensions(PathBuf),
    AddImageStrip(ContextId, ImageStrip),
    Render(ContextId, RenderSettings),
}

/// In-memory host recording every call.
///
/// Starts with one context, `scene`, active and in [`AreaMode::Default`].
/// Dimensions default to 1920x1080 unless set per path; renders succeed
/// unless [`MockHost::fail_render`] was called.
#[derive(Debug)]
pub struct MockHost {
    pub active: ContextId,
    pub area_mode: AreaMode,
    pub contexts: BTreeMap<ContextId, Option<ImageStrip>>,
    pub dimensions: HashMap<PathBuf, Dimensions>,
    pub default_dimensions: Dimensions,
    pub calls: Vec<HostCall>,
    render_error: Option<String>,
    fail_create: bool,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        let active = ContextId::new("scene");
        let mut contexts = BTreeMap::new();
        contexts.insert(active.clone(), None);
        Self {
            active,
            area_mode: AreaMode::Default,
            contexts,
            dimensions: HashMap::new(),
            default_dimensions: Dimensions { width: 1920, height: 1080 },
            calls: Vec::new(),
            render_error: None,
            fail_create: false,
        }
    }

    /// Makes the next render fail with a host encode failure.
    pub fn fail_render(&mut self, message: &str) {
        self.render_error = Some(message.to_string());
    }

    /// Makes context creation fail.
    pub fn fail_create(&mut self) {
        self.fail_create = true;
    }

    /// Registers dimensions for a specific image.
    pub fn set_dimensions(&mut self, path: impl Into<PathBuf>, width: u32, height: u32) {
        self.dimensions.insert(path.into(), Dimensions { width, height });
    }

    /// The render calls received so far.
    pub fn renders(&self) -> Vec<&RenderSettings> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Render(_, settings) => Some(settings),
                _ => None,
            })
            .collect()
    }

    /// The strips added so far.
    pub fn strips(&self) -> Vec<&ImageStrip> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::AddImageStrip(_, strip) => Some(strip),
                _ => None,
            })
            .collect()
    }

    /// Names of the contexts created so far.
    pub fn created_contexts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::CreateContext(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Host for MockHost {
    fn active_context(&self) -> ContextId {
        self.active.clone()
    }

    fn set_active_context(&mut self, context: &ContextId) -> CoreResult<()> {
        self.calls.push(HostCall::SetActiveContext(context.clone()));
        if !self.contexts.contains_key(context) {
            return Err(CoreError::UnknownContext(context.to_string()));
        }
        self.active = context.clone();
        Ok(())
    }

    fn area_mode(&self) -> AreaMode {
        self.area_mode
    }

    fn set_area_mode(&mut self, mode: AreaMode) {
        self.calls.push(HostCall::SetAreaMode(mode));
        self.area_mode = mode;
    }

    fn context_exists(&self, name: &str) -> bool {
        self.contexts.contains_key(&ContextId::new(name))
    }

    fn create_context(&mut self, name: &str) -> CoreResult<ContextId> {
        self.calls.push(HostCall::CreateContext(name.to_string()));
        if self.fail_create {
            return Err(CoreError::Io(std::io::Error::other("context creation refused")));
        }
        let id = ContextId::new(name);
        if self.contexts.contains_key(&id) {
            return Err(CoreError::ContextExists(name.to_string()));
        }
        self.contexts.insert(id.clone(), None);
        Ok(id)
    }

    fn remove_context(&mut self, context: &ContextId) -> CoreResult<()> {
        self.calls.push(HostCall::RemoveContext(context.clone()));
        self.contexts
            .remove(context)
            .map(|_| ())
            .ok_or_else(|| CoreError::UnknownContext(context.to_string()))
    }

    fn image_dimensions(&self, path: &Path) -> CoreResult<Dimensions> {
        Ok(self
            .dimensions
            .get(path)
            .copied()
            .unwrap_or(self.default_dimensions))
    }

    fn add_image_strip(&mut self, context: &ContextId, strip: &ImageStrip) -> CoreResult<()> {
        self.calls
            .push(HostCall::AddImageStrip(context.clone(), strip.clone()));
        let slot = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| CoreError::UnknownContext(context.to_string()))?;
        *slot = Some(strip.clone());
        Ok(())
    }

    fn render(&mut self, context: &ContextId, settings: &RenderSettings) -> CoreResult<PathBuf> {
        self.calls
            .push(HostCall::Render(context.clone(), settings.clone()));
        if let Some(message) = self.render_error.take() {
            return Err(CoreError::HostEncodeFailure(message));
        }
        match self.contexts.get(context) {
            Some(Some(_)) => Ok(settings.output_file()),
            Some(None) => Err(CoreError::NoImageStrip(context.to_string())),
            None => Err(CoreError::UnknownContext(context.to_string())),
        }
    }
}
