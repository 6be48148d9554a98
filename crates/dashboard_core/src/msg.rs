use crate::{AttemptId, DownloadedFile, PageId, RunStatus, Screen, ServiceKey, TestResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User switched screens. The screen being left loses its state.
    Navigate(Screen),
    /// User committed the template picker input; an empty string clears it.
    TemplatePicked(String),
    /// User pressed Run Now.
    RunClicked,
    /// One successful status poll for a run attempt.
    StatusPolled {
        attempt: AttemptId,
        status: RunStatus,
        step: String,
        error: Option<String>,
    },
    /// The run request of an attempt completed, one way or another.
    RunFinished {
        attempt: AttemptId,
        outcome: RunOutcome,
    },
    /// User pressed Test Connection for a service.
    TestClicked(ServiceKey),
    /// A connection test completed. `None` means the request itself failed.
    TestCompleted {
        page: PageId,
        service: ServiceKey,
        result: Option<TestResult>,
    },
    /// Engine event with nothing for the core to do.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Downloaded(DownloadedFile),
    Failed { message: String },
}
