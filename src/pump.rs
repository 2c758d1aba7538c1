//! Event pump for the UI task.
//!
//! Wraps the scheduler's timed receive and injects a synthetic
//! `AdcReading` event whenever a tick period passes, so screens redraw
//! their readouts while the user is idle and still react to input at once.

use crate::config::UI_TICK_PERIOD_MS;
use crate::event::{EventKind, UiEvent};

/// Scheduler services the UI task needs.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Monotonic tick counter (ms).
    fn now_ms(&self) -> u64;

    /// Next queued event, or `None` once `timeout_ms` have passed.
    async fn receive(&mut self, timeout_ms: u64) -> Option<UiEvent>;

    /// Suspend the UI task.
    async fn delay_ms(&mut self, ms: u64);
}

pub struct EventPump<E> {
    source: E,
    last_tick: u64,
}

impl<E: EventSource> EventPump<E> {
    pub fn new(source: E) -> Self {
        let last_tick = source.now_ms();
        Self { source, last_tick }
    }

    /// Wait for the next event. Never blocks longer than one tick period.
    pub async fn next_event(&mut self) -> UiEvent {
        let elapsed = self.source.now_ms().saturating_sub(self.last_tick);
        if elapsed < UI_TICK_PERIOD_MS {
            if let Some(event) = self.source.receive(UI_TICK_PERIOD_MS - elapsed).await {
                return event;
            }
        }

        let now = self.source.now_ms();
        self.last_tick = now;
        UiEvent::new(EventKind::AdcReading, now)
    }

    pub async fn delay_ms(&mut self, ms: u64) {
        self.source.delay_ms(ms).await;
    }

    pub fn source_mut(&mut self) -> &mut E {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimEvents;
    use embassy_futures::block_on;

    #[test]
    fn idle_pump_ticks_every_period() {
        let mut pump = EventPump::new(SimEvents::new());
        for n in 1..=5 {
            let event = block_on(pump.next_event());
            assert_eq!(event.kind, EventKind::AdcReading);
            assert_eq!(event.when, n * UI_TICK_PERIOD_MS);
        }
    }

    #[test]
    fn queued_event_is_delivered_before_tick() {
        let mut events = SimEvents::new();
        events.push_after(30, EventKind::UpDown(1));
        let mut pump = EventPump::new(events);

        let event = block_on(pump.next_event());
        assert_eq!(event, UiEvent::new(EventKind::UpDown(1), 30));

        // The tick still lands on schedule.
        let tick = block_on(pump.next_event());
        assert_eq!(tick, UiEvent::new(EventKind::AdcReading, UI_TICK_PERIOD_MS));
    }

    #[test]
    fn busy_queue_cannot_starve_ticks() {
        let mut events = SimEvents::new();
        for _ in 0..6 {
            events.push_after(40, EventKind::UpDown(1));
        }
        let mut pump = EventPump::new(events);

        let kinds: heapless::Vec<EventKind, 8> =
            (0..8).map(|_| block_on(pump.next_event()).kind).collect();
        assert_eq!(
            kinds.as_slice(),
            &[
                EventKind::UpDown(1), // 40
                EventKind::UpDown(1), // 80
                EventKind::AdcReading, // 100
                EventKind::UpDown(1), // 120
                EventKind::UpDown(1), // 160
                EventKind::UpDown(1), // 200
                EventKind::AdcReading, // 200, period fully elapsed
                EventKind::UpDown(1), // 240
            ]
        );
    }
}
