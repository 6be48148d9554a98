use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, IntegrationsView, RunPanelView};
use crate::{RunOutcome, ServiceKey};

pub type AttemptId = u64;
pub type PageId = u64;

/// File extensions the template picker accepts (compared case-insensitively).
const TEMPLATE_EXTENSIONS: [&str; 2] = ["md", "txt"];

const STEP_STARTING: &str = "Starting…";
const STEP_DONE: &str = "Done!";
const FALLBACK_RUN_ERROR: &str = "Network error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Run,
    Integrations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Fetching,
    Generating,
    Done,
    Error,
}

impl RunStatus {
    pub const ALL: [RunStatus; 5] = [
        RunStatus::Idle,
        RunStatus::Fetching,
        RunStatus::Generating,
        RunStatus::Done,
        RunStatus::Error,
    ];

    /// A run is in flight; Run Now is disabled.
    pub fn is_busy(self) -> bool {
        matches!(self, RunStatus::Fetching | RunStatus::Generating)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Done | RunStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Name suggested by the backend, shown verbatim.
    pub filename: String,
    /// Where the file was written.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RunState {
    pub(crate) status: RunStatus,
    pub(crate) step: String,
    pub(crate) error: String,
    pub(crate) attempt: Option<AttemptId>,
    pub(crate) polling: bool,
    pub(crate) template: Option<PathBuf>,
    pub(crate) picker_note: Option<String>,
    pub(crate) last_download: Option<DownloadedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct IntegrationsState {
    pub(crate) results: BTreeMap<ServiceKey, TestResult>,
    /// Single shared busy marker, not a per-key lock.
    pub(crate) testing: Option<ServiceKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    screen: Screen,
    page: PageId,
    last_attempt: AttemptId,
    run: RunState,
    integrations: IntegrationsState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            screen: self.screen,
            run: RunPanelView::from_state(&self.run),
            integrations: IntegrationsView::from_state(&self.integrations),
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn run_status(&self) -> RunStatus {
        self.run.status
    }

    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.run.attempt
    }

    /// The attempt whose poll is still active, if any.
    pub fn polling_attempt(&self) -> Option<AttemptId> {
        self.run.attempt.filter(|_| self.run.polling)
    }

    pub fn template(&self) -> Option<&Path> {
        self.run.template.as_deref()
    }

    pub fn testing(&self) -> Option<ServiceKey> {
        self.integrations.testing
    }

    pub fn test_result(&self, service: ServiceKey) -> Option<&TestResult> {
        self.integrations.results.get(&service)
    }

    pub(crate) fn is_polling(&self, attempt: AttemptId) -> bool {
        self.polling_attempt() == Some(attempt)
    }

    /// Switches screens and discards all page-local state.
    pub(crate) fn navigate(&mut self, screen: Screen) {
        self.screen = screen;
        self.page += 1;
        self.run = RunState::default();
        self.integrations = IntegrationsState::default();
        self.dirty = true;
    }

    pub(crate) fn pick_template(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.run.template = None;
            self.run.picker_note = None;
        } else if has_template_extension(Path::new(trimmed)) {
            self.run.template = Some(PathBuf::from(trimmed));
            self.run.picker_note = None;
        } else {
            self.run.picker_note = Some(format!("Not a .md or .txt file: {trimmed}"));
        }
        self.dirty = true;
    }

    pub(crate) fn begin_run(&mut self) -> AttemptId {
        self.last_attempt += 1;
        let attempt = self.last_attempt;
        self.run.attempt = Some(attempt);
        self.run.polling = true;
        self.run.status = RunStatus::Fetching;
        self.run.step = STEP_STARTING.to_string();
        self.run.error.clear();
        self.dirty = true;
        attempt
    }

    pub(crate) fn apply_polled(&mut self, status: RunStatus, step: String, error: Option<String>) {
        self.run.status = status;
        self.run.step = step;
        if status.is_terminal() {
            self.run.polling = false;
            if let Some(error) = error.filter(|e| !e.is_empty()) {
                self.run.error = error;
            }
        }
        self.dirty = true;
    }

    pub(crate) fn finish_run(&mut self, outcome: RunOutcome) {
        self.run.polling = false;
        match outcome {
            RunOutcome::Downloaded(file) => {
                self.run.status = RunStatus::Done;
                self.run.step = STEP_DONE.to_string();
                self.run.last_download = Some(file);
            }
            RunOutcome::Failed { message } => {
                self.run.status = RunStatus::Error;
                self.run.error = if message.trim().is_empty() {
                    FALLBACK_RUN_ERROR.to_string()
                } else {
                    message
                };
            }
        }
        self.dirty = true;
    }

    pub(crate) fn begin_test(&mut self, service: ServiceKey) {
        self.integrations.testing = Some(service);
        self.dirty = true;
    }

    pub(crate) fn complete_test(&mut self, service: ServiceKey, result: Option<TestResult>) {
        if let Some(result) = result {
            self.integrations.results.insert(service, result);
        }
        // Cleared even when another key has taken the marker since.
        self.integrations.testing = None;
        self.dirty = true;
    }
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEMPLATE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}
