//! LCD contrast slider.

use super::{Preempted, Transition, Ui};
use crate::config::{CONTRAST_MAX, DISPLAY_COLUMNS, GLYPH_WIDTH, PRIMARY_BUTTON};
use crate::control::Analog;
use crate::event::EventKind;
use crate::lcd::{glyph, Lcd};
use crate::pump::EventSource;
use crate::settings::Settings;
use crate::storage::SettingsStore;

const BAR_ROW: u8 = 4;
const BAR_LEFT_CAP: u8 = 15;
const BAR_RIGHT_CAP: u8 = 145;

/// Bar fill for `contrast` steps, two columns per step.
fn draw_bar<L: Lcd>(lcd: &mut L, contrast: i32) {
    let end = BAR_LEFT_CAP + 1 + (contrast.clamp(0, CONTRAST_MAX) as u8) * 2;
    lcd.clear(BAR_ROW, BAR_LEFT_CAP + 1, BAR_ROW + 1, end, 0xFF);
    lcd.clear(BAR_ROW, end, BAR_ROW + 1, BAR_RIGHT_CAP, 0x81);
}

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    /// Adjust the contrast live; the primary button stores it.
    pub(super) async fn contrast(&mut self) -> Transition {
        self.lcd.clear_all();
        self.lcd.clear(0, 0, 2, DISPLAY_COLUMNS, 0xFF);
        self.lcd.draw_text(0, 32, "Contrast", true);
        self.lcd.draw_text(6, 38, glyph::ENTER, false);
        self.lcd.draw_text(6, 38 + GLYPH_WIDTH, ": Done", false);
        self.lcd.clear(BAR_ROW, BAR_LEFT_CAP, BAR_ROW + 1, BAR_LEFT_CAP + 1, 0xFF);
        self.lcd.clear(BAR_ROW, BAR_RIGHT_CAP, BAR_ROW + 1, BAR_RIGHT_CAP + 1, 0xFF);

        let stored = *self.control.settings();
        let mut contrast = stored.lcd_contrast.clamp(0, CONTRAST_MAX);
        loop {
            draw_bar(&mut self.lcd, contrast);

            let event = self.next_event().await;
            match event.kind {
                EventKind::UpDown(detents) => {
                    contrast = contrast.saturating_add(detents).clamp(0, CONTRAST_MAX);
                    self.lcd.set_contrast(contrast as u8);
                }
                EventKind::ButtonPress(PRIMARY_BUTTON) => {
                    let settings = Settings {
                        lcd_contrast: contrast,
                        ..stored
                    };
                    if self.commit_settings(settings).await {
                        info!("Contrast set to {}", contrast);
                    } else {
                        self.lcd.set_contrast(stored.contrast());
                    }
                    return Transition::Home;
                }
                EventKind::Overtemp => {
                    self.lcd.set_contrast(stored.contrast());
                    return Preempted.into();
                }
                _ => {}
            }
        }
    }
}
