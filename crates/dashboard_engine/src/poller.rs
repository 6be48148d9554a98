use std::sync::Arc;
use std::time::Duration;

use dashboard_logging::{dash_debug, dash_info};
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{AttemptId, Backend, BackendError, EngineEvent, EventSink, StatusSnapshot};

/// Spawns [`poll_status`] on the current runtime.
pub fn spawn_status_poller(
    backend: Arc<dyn Backend>,
    attempt: AttemptId,
    interval: Duration,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        poll_status(backend.as_ref(), attempt, interval, sink.as_ref(), cancel).await;
    })
}

/// Queries the backend status once per `interval`, the first query one
/// interval after the call, until a terminal status is seen or `cancel` fires.
///
/// Ticks never wait for an earlier query: a slow backend gets overlapping
/// requests, and whichever answers first is reported first. A failed query is
/// logged and skipped.
pub async fn poll_status(
    backend: &dyn Backend,
    attempt: AttemptId,
    interval: Duration,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let interval = interval.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight: FuturesUnordered<BoxFuture<'_, Result<StatusSnapshot, BackendError>>> =
        FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                dash_debug!(
                    "status poll for attempt {} cancelled with {} request(s) in flight",
                    attempt,
                    in_flight.len()
                );
                return;
            }
            Some(result) = in_flight.next(), if !in_flight.is_empty() => match result {
                Ok(snapshot) => {
                    let phase = snapshot.status;
                    sink.emit(EngineEvent::StatusPolled { attempt, snapshot });
                    if phase.is_terminal() {
                        dash_info!("status poll for attempt {} saw terminal {:?}", attempt, phase);
                        return;
                    }
                }
                Err(err) => {
                    dash_debug!("status poll for attempt {} failed: {}", attempt, err);
                }
            },
            _ = ticker.tick() => {
                in_flight.push(backend.status());
            }
        }
    }
}
