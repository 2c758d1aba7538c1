//! UI events and the bounded queue that carries them from the input
//! producers to the UI task.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::{Channel, TrySendError};

use crate::config::EVENT_QUEUE_DEPTH;
use crate::error::Error;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    None,
    /// Debounced press; carries the button id bitmask (1 = encoder push).
    ButtonPress(u8),
    /// Signed number of encoder detents (may be batched).
    UpDown(i32),
    /// Periodic redraw tick synthesized by the event pump.
    AdcReading,
    /// Asynchronous overtemperature notification from the front end.
    Overtemp,
}

/// One UI event with the tick (ms) it was produced at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiEvent {
    pub kind: EventKind,
    pub when: u64,
}

impl UiEvent {
    pub const fn new(kind: EventKind, when: u64) -> Self {
        Self { kind, when }
    }

    /// True for a press of the given button.
    pub fn is_press_of(&self, button: u8) -> bool {
        matches!(self.kind, EventKind::ButtonPress(id) if id == button)
    }
}

/// Bounded FIFO shared by the input producers and the UI task.
///
/// Producers use [`post`] (never blocks); the UI task receives through an
/// [`EventSource`](crate::pump::EventSource) implementation.
pub type EventQueue<M = CriticalSectionRawMutex> = Channel<M, UiEvent, EVENT_QUEUE_DEPTH>;

/// Non-blocking enqueue for interrupt-level producers.
///
/// When the queue is full the event is dropped: detents only carry a
/// direction and the user will press the button again.
pub fn post<M: RawMutex>(queue: &EventQueue<M>, event: UiEvent) -> Result<(), Error> {
    match queue.try_send(event) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(dropped)) => {
            warn!("UI queue full - dropping {:?}", dropped.kind);
            Err(Error::QueueFull)
        }
    }
}
