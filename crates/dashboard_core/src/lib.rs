//! Dashboard core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod services;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, RunOutcome};
pub use services::{ServiceDescriptor, ServiceKey, SERVICES};
pub use state::{AppState, AttemptId, DownloadedFile, PageId, RunStatus, Screen, TestResult};
pub use update::update;
pub use view_model::{
    status_badge, AppViewModel, Badge, IntegrationsView, ResultLine, RunPanelView,
    ServiceRowView, Tone, DOWNLOAD_SUCCESS_LINE,
};
