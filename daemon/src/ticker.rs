use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::event::DaemonEvent;

pub const TICK_INTERVAL_SECS: u64 = 1;

/// Sends [`DaemonEvent::Tick`] once per second until the receiver is dropped.
///
/// The first tick fires immediately so the face is drawn at startup. A slow
/// consumer delays the ticker rather than queueing a burst of catch-up ticks.
pub async fn run(tx: mpsc::Sender<DaemonEvent>) {
    let mut ticker = interval(Duration::from_secs(TICK_INTERVAL_SECS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if tx.send(DaemonEvent::Tick).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let (tx, mut rx) = mpsc::channel(4);
        let start = tokio::time::Instant::now();
        let handle = tokio::spawn(run(tx));

        for _ in 0..3 {
            assert!(matches!(rx.recv().await, Some(DaemonEvent::Tick)));
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");

        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn aborting_stops_the_ticker() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = tokio::spawn(run(tx));
        assert!(rx.recv().await.is_some());

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        // The sender went away with the task.
        while rx.recv().await.is_some() {}
    }
}
