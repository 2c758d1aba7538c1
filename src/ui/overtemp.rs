//! Thermal fault banner.

use super::{Transition, Ui};
use crate::config::{DISPLAY_COLUMNS, DISPLAY_ROWS, GLYPH_WIDTH, PRIMARY_BUTTON};
use crate::control::{Analog, OutputMode};
use crate::lcd::{glyph, Lcd};
use crate::pump::EventSource;
use crate::storage::SettingsStore;

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    /// Hold the fault banner until the front end has recovered on its own
    /// (output back in feedback mode) or the user acknowledges. An
    /// acknowledgement restarts the load from 0 A.
    pub(super) async fn overtemp(&mut self) -> Transition {
        warn!("Overtemperature - output disabled");
        self.lcd.clear(0, 0, DISPLAY_ROWS, DISPLAY_COLUMNS, 0xFF);
        self.lcd.draw_text(2, 6, "! OVERTEMP !", true);
        self.lcd.draw_text(6, 32, glyph::ENTER, true);
        self.lcd.draw_text(6, 32 + GLYPH_WIDTH, ": Reset", true);

        loop {
            let event = self.next_event().await;
            if self.control.output_mode() == OutputMode::Feedback {
                info!("Overtemp cleared by the front end");
                return Transition::Home;
            }
            if event.is_press_of(PRIMARY_BUTTON) {
                break;
            }
        }

        info!("Overtemp acknowledged - setpoint reset");
        self.control.set_current(0);
        self.control.set_output_mode(OutputMode::Feedback);
        Transition::Home
    }
}
