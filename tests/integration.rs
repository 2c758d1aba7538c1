//! Integration tests for the Re:load core: producers, queue and UI task
//! wired together through the public API only.

use embassy_futures::block_on;
use reload::control::{AdcChannel, Analog, CurrentRange, OutputMode};
use reload::event::{post, EventKind, EventQueue, UiEvent};
use reload::format::{format_number, format_resistance};
use reload::input::{ButtonDebouncer, QuadratureDecoder};
use reload::lcd::Lcd;
use reload::pump::EventSource;
use reload::settings::{DisplaySettings, Settings};
use reload::storage::SettingsStore;
use reload::ui::{State, Ui};
use reload::Error;

use critical_section as _;

/// One clockwise detent, starting from rest (both lines high).
const CW_DETENT: [u8; 4] = [0x2, 0x0, 0x1, 0x3];

/// Front end with the output stage in regulation and every ADC at zero.
#[derive(Default)]
struct Bench {
    mode: Option<OutputMode>,
}

impl Analog for Bench {
    fn set_dac(&mut self, _counts: u16) {}

    fn set_current_range(&mut self, _range: CurrentRange) {}

    fn set_opamp_offset_trim(&mut self, _trim: u8) {}

    fn adc_read(&self, _channel: AdcChannel) -> i16 {
        0
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = Some(mode);
    }

    fn output_mode(&self) -> OutputMode {
        self.mode.unwrap_or(OutputMode::Feedback)
    }
}

#[derive(Default)]
struct Screen {
    big: Vec<String>,
}

impl Lcd for Screen {
    fn clear_all(&mut self) {}
    fn clear(&mut self, _: u8, _: u8, _: u8, _: u8, _: u8) {}
    fn draw_text(&mut self, _: u8, _: u8, _: &str, _: bool) {}

    fn draw_big_numbers(&mut self, _row: u8, _col: u8, text: &str) {
        self.big.push(text.to_string());
    }

    fn set_contrast(&mut self, _: u8) {}
}

/// Drains a real queue; time only moves when the UI waits. Once the
/// queue runs dry the next `later` event is posted, as a producer would.
struct Drain<'q> {
    queue: &'q EventQueue,
    later: Vec<UiEvent>,
    now: u64,
}

impl EventSource for Drain<'_> {
    fn now_ms(&self) -> u64 {
        self.now
    }

    async fn receive(&mut self, timeout_ms: u64) -> Option<UiEvent> {
        if let Ok(event) = self.queue.try_receive() {
            return Some(event);
        }
        self.now += timeout_ms;
        if !self.later.is_empty() {
            let _ = post(self.queue, self.later.remove(0));
        }
        None
    }

    async fn delay_ms(&mut self, ms: u64) {
        self.now += ms;
    }
}

struct NoFlash;

impl SettingsStore for NoFlash {
    async fn load_settings(&mut self) -> Option<Settings> {
        None
    }

    async fn save_settings(&mut self, _: &Settings) -> Result<(), Error> {
        Err(Error::Storage)
    }

    async fn load_display(&mut self) -> Option<DisplaySettings> {
        None
    }

    async fn save_display(&mut self, _: &DisplaySettings) -> Result<(), Error> {
        Err(Error::Storage)
    }
}

fn turn(decoder: &mut QuadratureDecoder, queue: &EventQueue, now: u64) {
    for levels in CW_DETENT {
        if let Some(event) = decoder.on_edge(levels, now) {
            let _ = post(queue, event);
        }
    }
}

#[test]
fn encoder_detents_reach_the_setpoint() {
    let queue: EventQueue = EventQueue::new();
    let press = UiEvent::new(EventKind::ButtonPress(1), 500);

    block_on(async {
        let events = Drain {
            queue: &queue,
            later: vec![press],
            now: 0,
        };
        let mut ui = Ui::start(Bench::default(), Screen::default(), events, NoFlash).await;
        while ui.state() != State::CC_LOAD {
            ui.step().await;
        }

        let mut decoder = QuadratureDecoder::new();
        turn(&mut decoder, &queue, 10);
        turn(&mut decoder, &queue, 20);
        ui.step().await;

        assert_eq!(ui.control().current_setpoint(), 10_000);
        assert_eq!(ui.control().current_range(), CurrentRange::Low);
        assert!(ui.lcd().big.iter().any(|text| text == "10.0mA "));
        assert_eq!(ui.state(), State::MAIN_MENU);
        assert_eq!(ui.main_state(), State::CC_LOAD);
    });
}

#[test]
fn bouncing_button_posts_one_press() {
    let queue: EventQueue = EventQueue::new();
    let mut debouncer = ButtonDebouncer::new();
    for now in [1000, 1010, 1030, 1099] {
        if let Some(event) = debouncer.on_edge(1, now) {
            let _ = post(&queue, event);
        }
    }

    let first = queue.try_receive().ok();
    assert_eq!(first, Some(UiEvent::new(EventKind::ButtonPress(1), 1000)));
    assert!(queue.try_receive().is_err());
}

#[test]
fn full_queue_rejects_producers() {
    let queue: EventQueue = EventQueue::new();
    assert!(post(&queue, UiEvent::new(EventKind::UpDown(1), 0)).is_ok());
    assert!(post(&queue, UiEvent::new(EventKind::UpDown(1), 1)).is_ok());
    assert_eq!(
        post(&queue, UiEvent::new(EventKind::Overtemp, 2)),
        Err(Error::QueueFull)
    );
}

#[test]
fn readouts_share_one_envelope() {
    for value in [0, 5_000, 999_999, 1_000_000, 12_345_678, 999_999_999] {
        assert_eq!(format_number(value, 'A').chars().count(), 6, "{value}");
    }
    assert_eq!(format_resistance(None).as_str(), "----Ω");
}
