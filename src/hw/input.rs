//! GPIO edge tasks for the rotary encoder and its push-button.
//!
//! Encoder A/B and the button are active-low with internal pull-ups. Each
//! task waits for a GPIO edge, runs the pure decoder from
//! [`reload::input`] and posts the resulting event without blocking.

use defmt::debug;
use embassy_futures::select::select;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::Instant;
use reload::config::PRIMARY_BUTTON;
use reload::event::{post, EventQueue};
use reload::input::{ButtonDebouncer, QuadratureDecoder};

/// Decode encoder edges into detents.
#[embassy_executor::task]
pub async fn encoder_task(a: AnyPin, b: AnyPin, queue: &'static EventQueue) -> ! {
    let mut a = Input::new(a, Pull::Up);
    let mut b = Input::new(b, Pull::Up);
    let mut decoder = QuadratureDecoder::with_levels(levels(&a, &b));

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;

        if let Some(event) = decoder.on_edge(levels(&a, &b), Instant::now().as_millis()) {
            debug!("Encoder: {}", event.kind);
            // A full queue drops the detent.
            let _ = post(queue, event);
        }
    }
}

/// Gray code of the encoder lines, `A | B << 1`.
fn levels(a: &Input<'_>, b: &Input<'_>) -> u8 {
    (a.is_high() as u8) | ((b.is_high() as u8) << 1)
}

/// Debounce the encoder push-button.
#[embassy_executor::task]
pub async fn button_task(pin: AnyPin, queue: &'static EventQueue) -> ! {
    let mut button = Input::new(pin, Pull::Up);
    let mut debouncer = ButtonDebouncer::new();

    loop {
        // Falling edge = press (active-low).
        button.wait_for_falling_edge().await;

        if let Some(event) = debouncer.on_edge(PRIMARY_BUTTON, Instant::now().as_millis()) {
            debug!("Button: {}", event.kind);
            let _ = post(queue, event);
        }
    }
}
