use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_core::{DownloadedFile, Effect, Msg, RunOutcome, RunStatus, ServiceKey, TestResult};
use dashboard_engine::{ChannelEventSink, EngineError, EngineEvent, EngineHandle, RemotePhase};
use dashboard_logging::{dash_info, dash_warn};

use super::config::AppConfig;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let sink = Arc::new(ChannelEventSink::new(event_tx));
        let engine = EngineHandle::new(config.engine_settings(), sink)?;
        spawn_event_loop(event_rx, msg_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { attempt } => {
                    self.engine.start_polling(attempt);
                }
                Effect::SubmitRun { attempt, template } => {
                    dash_info!(
                        "SubmitRun attempt={} template={:?}",
                        attempt,
                        template.as_deref()
                    );
                    self.engine.submit_run(attempt, template);
                }
                Effect::StopPolling { attempt } => {
                    self.engine.stop_polling(attempt);
                }
                Effect::TestConnection { page, service } => {
                    dash_info!("TestConnection page={} service={}", page, service.as_str());
                    self.engine.test_connection(page, service.as_str());
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for event in event_rx {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatusPolled { attempt, snapshot } => Msg::StatusPolled {
            attempt,
            status: map_phase(snapshot.status),
            step: snapshot.step,
            error: snapshot.error,
        },
        EngineEvent::RunCompleted { attempt, result } => Msg::RunFinished {
            attempt,
            outcome: match result {
                Ok(saved) => RunOutcome::Downloaded(DownloadedFile {
                    filename: saved.filename,
                    path: saved.path,
                }),
                Err(err) => RunOutcome::Failed {
                    message: err.user_message(),
                },
            },
        },
        EngineEvent::ConnectionTested {
            page,
            service,
            result,
        } => {
            let Some(service) = ServiceKey::from_key(&service) else {
                dash_warn!("Connection result for unknown service {}", service);
                return Msg::NoOp;
            };
            Msg::TestCompleted {
                page,
                service,
                // The engine already logged the failure; nothing is shown for it.
                result: result.ok().map(|report| TestResult {
                    ok: report.ok,
                    message: report.message,
                }),
            }
        }
    }
}

fn map_phase(phase: RemotePhase) -> RunStatus {
    match phase {
        RemotePhase::Idle => RunStatus::Idle,
        RemotePhase::Fetching => RunStatus::Fetching,
        RemotePhase::Generating => RunStatus::Generating,
        RemotePhase::Done => RunStatus::Done,
        RemotePhase::Error => RunStatus::Error,
    }
}
