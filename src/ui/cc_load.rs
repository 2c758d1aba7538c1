//! Constant-current operating screen.

use super::{Preempted, State, Transition, Ui};
use crate::config::{DISPLAY_COLUMNS, PRIMARY_BUTTON};
use crate::control::{Analog, Control};
use crate::event::EventKind;
use crate::lcd::{text_width, Lcd};
use crate::pump::EventSource;
use crate::readout;
use crate::settings::{DisplayConfig, ReadoutKind};
use crate::storage::SettingsStore;

/// Column where the second small readout starts.
const RIGHT_READOUT_COL: u8 = 88;

/// Draw the readouts of an operating screen.
///
/// Slot 0 uses the big numerals in rows 0-3 with its label tag in the top
/// right corner; slots 1 and 2 share row 6.
pub fn draw_status<A: Analog, L: Lcd>(lcd: &mut L, control: &Control<A>, config: &DisplayConfig) {
    let main = config.readouts[0];
    if main == ReadoutKind::None {
        lcd.clear(0, 0, 6, 120, 0);
        lcd.clear(4, 120, 6, DISPLAY_COLUMNS, 0);
    } else {
        let mut text = readout::render(main, control);
        let _ = text.push(' ');
        lcd.draw_big_numbers(0, 0, &text);
        if !text.contains('.') {
            // Shorter layouts leave the tail of the previous one behind.
            lcd.clear(0, 108, 4, 120, 0);
        }
    }

    let label = main.label();
    let width = text_width(label);
    lcd.draw_text(0, DISPLAY_COLUMNS - width, label, true);
    if width < 36 {
        lcd.clear(0, 124, 2, DISPLAY_COLUMNS - width, 0);
    }

    for (col, kind) in [0, RIGHT_READOUT_COL].into_iter().zip(&config.readouts[1..]) {
        let text = readout::render(*kind, control);
        lcd.draw_text(6, col, &text, false);
    }
}

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    pub(super) async fn cc_load(&mut self) -> Transition {
        self.lcd.clear_all();

        loop {
            let event = self.next_event().await;
            match event.kind {
                EventKind::ButtonPress(PRIMARY_BUTTON) => return Transition::To(State::MAIN_MENU),
                EventKind::UpDown(detents) => {
                    self.control.adjust_current(detents);
                    debug!("Setpoint {} uA", self.control.current_setpoint());
                }
                EventKind::Overtemp => return Preempted.into(),
                _ => {}
            }
            draw_status(&mut self.lcd, &self.control, &self.display.cc);
        }
    }
}
