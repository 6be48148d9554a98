use crate::state::{IntegrationsState, RunState};
use crate::{RunStatus, Screen, ServiceKey, SERVICES};

/// Fixed line shown once a run has produced its download.
pub const DOWNLOAD_SUCCESS_LINE: &str = "Newsletter downloaded successfully.";

/// Semantic color of a badge or result line; the renderer picks actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Accent,
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub text: &'static str,
    pub tone: Tone,
}

pub fn status_badge(status: RunStatus) -> Badge {
    let (text, tone) = match status {
        RunStatus::Idle => ("Never Run", Tone::Neutral),
        RunStatus::Fetching => ("Fetching Data…", Tone::Info),
        RunStatus::Generating => ("Generating…", Tone::Accent),
        RunStatus::Done => ("Success", Tone::Affirmative),
        RunStatus::Error => ("Failed", Tone::Negative),
    };
    Badge { text, tone }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub screen: Screen,
    pub run: RunPanelView,
    pub integrations: IntegrationsView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPanelView {
    pub status: RunStatus,
    pub badge: Badge,
    pub run_enabled: bool,
    pub run_label: &'static str,
    /// Step text next to the spinner; present only while a run is in flight.
    pub progress_step: Option<String>,
    pub success_line: Option<&'static str>,
    pub saved_to: Option<String>,
    pub error_line: Option<String>,
    pub template: Option<String>,
    pub picker_note: Option<String>,
}

impl RunPanelView {
    pub(crate) fn from_state(run: &RunState) -> Self {
        let status = run.status;
        let busy = status.is_busy();
        let done = status == RunStatus::Done;
        Self {
            status,
            badge: status_badge(status),
            run_enabled: !busy,
            run_label: if busy { "Running…" } else { "Run Now" },
            progress_step: busy.then(|| run.step.clone()),
            success_line: done.then_some(DOWNLOAD_SUCCESS_LINE),
            saved_to: run
                .last_download
                .as_ref()
                .filter(|_| done)
                .map(|file| file.path.display().to_string()),
            error_line: (status == RunStatus::Error).then(|| format!("Error: {}", run.error)),
            template: run
                .template
                .as_ref()
                .map(|path| path.display().to_string()),
            picker_note: run.picker_note.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationsView {
    pub rows: Vec<ServiceRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRowView {
    pub key: ServiceKey,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub result: Option<ResultLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub text: String,
    pub tone: Tone,
}

impl IntegrationsView {
    pub(crate) fn from_state(integrations: &IntegrationsState) -> Self {
        let rows = SERVICES
            .iter()
            .map(|descriptor| {
                let testing = integrations.testing == Some(descriptor.key);
                ServiceRowView {
                    key: descriptor.key,
                    label: descriptor.label,
                    placeholder: descriptor.placeholder,
                    button_label: if testing { "Testing…" } else { "Test Connection" },
                    button_enabled: !testing,
                    result: integrations.results.get(&descriptor.key).map(|result| {
                        if result.ok {
                            ResultLine {
                                text: format!("✓ {}", result.message),
                                tone: Tone::Affirmative,
                            }
                        } else {
                            ResultLine {
                                text: format!("✗ {}", result.message),
                                tone: Tone::Negative,
                            }
                        }
                    }),
                }
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, key: ServiceKey) -> Option<&ServiceRowView> {
        self.rows.iter().find(|row| row.key == key)
    }
}
