//! Readout layout editor for the CC load screen.

use super::menu::{CHOOSE_SLOT_MENU, READOUT_MENU};
use super::{Preempted, Transition, Ui};
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
    pub(super) async fn readout_config(&mut self) -> Transition {
        match self.choose_readout().await {
            Ok(()) => Transition::Home,
            Err(preempted) => preempted.into(),
        }
    }

    /// Pick a slot, then what it shows, and store the new layout.
    async fn choose_readout(&mut self) -> Result<(), Preempted> {
        let slot = self.run_menu(&CHOOSE_SLOT_MENU).await?;
        let kind = self.run_menu(&READOUT_MENU).await?;

        let mut display = self.display;
        let Some(target) = display.cc.readouts.get_mut(slot) else {
            return Ok(());
        };
        *target = kind;

        match self.store.save_display(&display).await {
            Ok(()) => {
                info!("Readout slot {} now shows {:?}", slot, kind);
                self.display = display;
            }
            Err(_) => error!("Readout layout not saved"),
        }
        Ok(())
    }
}
