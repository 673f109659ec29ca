//! Driving a long-running operation while consuming its progress events.

use std::future::Future;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Duration, Instant};

/// Upper bound on how long to keep draining once the task has finished.
/// Guards against a sender clone that outlives the task.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `task` to completion, passing every event received on `event_rx` to
/// `on_event`. Events still queued when the task finishes are delivered
/// before the task's result is returned.
pub async fn run_with_events<F, E, R>(
    task: F,
    mut event_rx: UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);
    let mut result = None;
    let mut event_count: u64 = 0;

    loop {
        tokio::select! {
            r = &mut task, if result.is_none() => {
                log::debug!("run_with_events: task finished after {} events", event_count);
                result = Some(r);
                break;
            }
            event = event_rx.recv() => {
                match event {
                    Some(e) => {
                        event_count += 1;
                        on_event(e);
                    }
                    None => {
                        log::debug!("run_with_events: channel closed after {} events", event_count);
                        break;
                    }
                }
            }
        }
    }

    if result.is_some() {
        let deadline = Instant::now() + DRAIN_TIMEOUT;
        loop {
            match tokio::time::timeout_at(deadline, event_rx.recv()).await {
                Ok(Some(e)) => on_event(e),
                Ok(None) => break,
                Err(_) => {
                    log::warn!(
                        "run_with_events: gave up draining events after {}s",
                        DRAIN_TIMEOUT.as_secs()
                    );
                    break;
                }
            }
        }
    }

    match result {
        Some(r) => r,
        None => task.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn delivers_every_event_before_returning() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..5 {
                let _ = tx.send(i);
            }
            "done"
        };

        let mut seen = Vec::new();
        let result = run_with_events(task, rx, |e| seen.push(e)).await;
        assert_eq!(result, "done");
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }
}
