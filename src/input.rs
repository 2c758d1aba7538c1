//! Edge-level input decoding for the rotary encoder and its push-button.
//!
//! Both decoders are plain state machines fed from the edge handlers
//! (interrupt tasks on the target). They hold the state that has to
//! survive between edges and hand back the event to post, if any.

use crate::config::{BUTTON_DEBOUNCE_MS, EDGES_PER_DETENT};
use crate::event::{EventKind, UiEvent};

/// Software debounce for the encoder push-button.
///
/// A press is accepted only if at least [`BUTTON_DEBOUNCE_MS`] have passed
/// since the last accepted one.
#[derive(Clone, Debug, Default)]
pub struct ButtonDebouncer {
    last_accepted: Option<u64>,
}

impl ButtonDebouncer {
    pub const fn new() -> Self {
        Self {
            last_accepted: None,
        }
    }

    /// Handle one button edge. `buttons` is the latched button-id bitmask.
    pub fn on_edge(&mut self, buttons: u8, now: u64) -> Option<UiEvent> {
        if let Some(last) = self.last_accepted {
            if now.wrapping_sub(last) < BUTTON_DEBOUNCE_MS {
                return None;
            }
        }
        self.last_accepted = Some(now);
        Some(UiEvent::new(EventKind::ButtonPress(buttons), now))
    }
}

/// Successor of each 2-bit gray code level in the forward direction.
const FORWARD: [u8; 4] = [0x1, 0x3, 0x0, 0x2];

/// Quadrature decoder that turns A/B edges into whole detents.
///
/// Edges that are neither one step forward nor one step back are glitches
/// and leave the decoder untouched. Partial detents are kept until four
/// edges in the same direction have accumulated.
#[derive(Clone, Debug)]
pub struct QuadratureDecoder {
    last_levels: u8,
    count: i8,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureDecoder {
    /// Decoder resting in the detent position (both lines high).
    pub const fn new() -> Self {
        Self::with_levels(0x3)
    }

    /// Decoder starting from the given line levels (`A | B << 1`).
    pub const fn with_levels(levels: u8) -> Self {
        Self {
            last_levels: levels & 0x3,
            count: 0,
        }
    }

    /// Handle one edge with the freshly sampled line levels.
    pub fn on_edge(&mut self, levels: u8, now: u64) -> Option<UiEvent> {
        let levels = levels & 0x3;

        if FORWARD[self.last_levels as usize] == levels {
            self.count += 1;
            self.last_levels = levels;
        } else if FORWARD[levels as usize] == self.last_levels {
            self.count -= 1;
            self.last_levels = levels;
        }

        if self.count.abs() >= EDGES_PER_DETENT {
            let detents = self.count / EDGES_PER_DETENT;
            self.count %= EDGES_PER_DETENT;
            return Some(UiEvent::new(EventKind::UpDown(detents as i32), now));
        }
        None
    }

    /// Edges accumulated towards the next detent (signed).
    pub fn pending_edges(&self) -> i8 {
        self.count
    }
}
