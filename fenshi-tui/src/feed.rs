//! Mock tick feed driving the shared chart.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use fenshi_chart::{FenshiChart, MockWalk};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info};

/// Spawn a task appending one synthetic tick every `period` until aborted.
///
/// Ticks are skipped, not queued, while `paused` is set.
pub fn spawn_mock_feed(
    chart: Arc<Mutex<FenshiChart>>,
    mut walk: MockWalk,
    period: Duration,
    paused: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(period_ms = period.as_millis() as u64, "mock feed started");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if paused.load(Ordering::Relaxed) {
                continue;
            }

            let tick = walk.next_tick();
            let mut guard = chart.lock().await;
            guard.add_data(tick);
            debug!(
                price = tick.price(),
                volume = tick.volume(),
                direction = %tick.direction(),
                len = guard.len(),
                "tick appended"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn walk() -> MockWalk {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        MockWalk::new(start, 100.0, 11).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_appends_until_paused() {
        let chart = Arc::new(Mutex::new(FenshiChart::default()));
        let paused = Arc::new(AtomicBool::new(false));
        let handle = spawn_mock_feed(
            Arc::clone(&chart),
            walk(),
            Duration::from_millis(100),
            Arc::clone(&paused),
        );

        tokio::time::sleep(Duration::from_millis(350)).await;
        let appended = chart.lock().await.len();
        assert!(appended >= 3, "appended {appended}");

        paused.store(true, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let frozen = chart.lock().await.len();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(chart.lock().await.len(), frozen);

        handle.abort();
    }
}
