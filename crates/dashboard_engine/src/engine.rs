use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_logging::{dash_info, dash_warn};
use tokio_util::sync::CancellationToken;

use crate::disposition::sanitize_download_name;
use crate::persist::DownloadStore;
use crate::poller::spawn_status_poller;
use crate::{
    AttemptId, Backend, BackendError, BackendSettings, EngineError, EngineEvent, PageId,
    ReqwestBackend, SavedDownload, TemplateUpload,
};

const FALLBACK_TEMPLATE_NAME: &str = "template.md";

/// Receives engine events; called from engine worker tasks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub backend: BackendSettings,
    pub poll_interval: Duration,
    pub download_dir: PathBuf,
}

impl EngineSettings {
    pub fn new(backend: BackendSettings, download_dir: PathBuf) -> Self {
        Self {
            backend,
            poll_interval: Duration::from_secs(1),
            download_dir,
        }
    }
}

enum EngineCommand {
    StartPolling { attempt: AttemptId },
    StopPolling { attempt: AttemptId },
    SubmitRun {
        attempt: AttemptId,
        template: Option<PathBuf>,
    },
    TestConnection { page: PageId, service: String },
}

/// Front door to the engine thread. Dropping the last handle stops every poll.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let backend = Arc::new(ReqwestBackend::new(settings.backend.clone())?);
        Self::with_backend(backend, settings, sink)
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        settings: EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("dashboard-engine-worker")
            .build()?;
        let store = DownloadStore::new(settings.download_dir.clone());
        let poll_interval = settings.poll_interval;

        thread::Builder::new()
            .name("dashboard-engine".to_string())
            .spawn(move || {
                let mut polls: HashMap<AttemptId, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::StartPolling { attempt } => {
                            let token = CancellationToken::new();
                            if let Some(previous) = polls.insert(attempt, token.clone()) {
                                previous.cancel();
                            }
                            let _runtime = runtime.enter();
                            spawn_status_poller(
                                backend.clone(),
                                attempt,
                                poll_interval,
                                sink.clone(),
                                token,
                            );
                        }
                        EngineCommand::StopPolling { attempt } => {
                            if let Some(token) = polls.remove(&attempt) {
                                token.cancel();
                            }
                        }
                        EngineCommand::SubmitRun { attempt, template } => {
                            let poll = polls.get(&attempt).cloned();
                            let backend = backend.clone();
                            let sink = sink.clone();
                            let store = store.clone();
                            runtime.spawn(async move {
                                let result =
                                    run_attempt(backend.as_ref(), template.as_deref(), &store)
                                        .await;
                                // The run request is over; its poll goes with it.
                                if let Some(token) = poll {
                                    token.cancel();
                                }
                                log_run_result(attempt, &result);
                                sink.emit(EngineEvent::RunCompleted { attempt, result });
                            });
                        }
                        EngineCommand::TestConnection { page, service } => {
                            let backend = backend.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let result = backend.test_connection(&service).await;
                                match &result {
                                    Ok(report) => dash_info!(
                                        "test-connection {} ok={} message={}",
                                        service,
                                        report.ok,
                                        report.message
                                    ),
                                    Err(err) => {
                                        dash_warn!("test-connection {} failed: {}", service, err)
                                    }
                                }
                                sink.emit(EngineEvent::ConnectionTested {
                                    page,
                                    service,
                                    result,
                                });
                            });
                        }
                    }
                }
                for token in polls.into_values() {
                    token.cancel();
                }
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn start_polling(&self, attempt: AttemptId) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling { attempt });
    }

    pub fn stop_polling(&self, attempt: AttemptId) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling { attempt });
    }

    pub fn submit_run(&self, attempt: AttemptId, template: Option<PathBuf>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::SubmitRun { attempt, template });
    }

    pub fn test_connection(&self, page: PageId, service: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::TestConnection {
            page,
            service: service.into(),
        });
    }
}

/// One run request end to end: read the template, call the backend, save the document.
pub async fn run_attempt(
    backend: &dyn Backend,
    template: Option<&Path>,
    store: &DownloadStore,
) -> Result<SavedDownload, BackendError> {
    let upload = match template {
        Some(path) => Some(read_template(path).await?),
        None => None,
    };
    let download = backend.run(upload).await?;
    let stored_name = sanitize_download_name(&download.filename);
    let byte_len = download.bytes.len() as u64;
    let path = store.save_off_runtime(stored_name, download.bytes).await?;
    Ok(SavedDownload {
        filename: download.filename,
        path,
        byte_len,
    })
}

async fn read_template(path: &Path) -> Result<TemplateUpload, BackendError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| BackendError::Template(format!("{}: {}", path.display(), err)))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_TEMPLATE_NAME.to_string());
    Ok(TemplateUpload { file_name, bytes })
}

fn log_run_result(attempt: AttemptId, result: &Result<SavedDownload, BackendError>) {
    match result {
        Ok(saved) => dash_info!(
            "run attempt {} saved {} ({} bytes) to {:?}",
            attempt,
            saved.filename,
            saved.byte_len,
            saved.path
        ),
        Err(err) => dash_warn!("run attempt {} failed: {}", attempt, err),
    }
}
