//! Scheduler services for the UI task on top of `embassy-time`.

use embassy_time::{with_timeout, Duration, Instant, Timer};
use reload::event::{EventQueue, UiEvent};
use reload::pump::EventSource;

/// Receives from the static UI queue with the Embassy time driver.
pub struct QueueEvents {
    queue: &'static EventQueue,
}

impl QueueEvents {
    pub fn new(queue: &'static EventQueue) -> Self {
        Self { queue }
    }
}

impl EventSource for QueueEvents {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn receive(&mut self, timeout_ms: u64) -> Option<UiEvent> {
        with_timeout(Duration::from_millis(timeout_ms), self.queue.receive())
            .await
            .ok()
    }

    async fn delay_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
