use std::path::PathBuf;

use crate::{AttemptId, PageId, ServiceKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the repeating status poll for a run attempt.
    StartPolling { attempt: AttemptId },
    /// Submit the run request, attaching the template file if one was picked.
    SubmitRun {
        attempt: AttemptId,
        template: Option<PathBuf>,
    },
    /// Cancel the status poll of a run attempt. Idempotent.
    StopPolling { attempt: AttemptId },
    TestConnection { page: PageId, service: ServiceKey },
}
