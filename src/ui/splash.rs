use super::{State, Transition, Ui};
use crate::config::SPLASH_DURATION_MS;
use crate::control::Analog;
use crate::lcd::Lcd;
use crate::pump::EventSource;
use crate::storage::SettingsStore;

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    pub(super) async fn splash(&mut self) -> Transition {
        self.lcd.clear_all();
        self.lcd.draw_text(2, 20, "Re:load Pro", false);
        self.lcd.draw_text(4, 8, env!("CARGO_PKG_VERSION"), false);
        self.lcd.flush();
        self.events.delay_ms(SPLASH_DURATION_MS).await;
        Transition::To(State::CC_LOAD)
    }
}
