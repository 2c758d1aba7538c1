//! User interface subsystem - LCD screens driven by the rotary encoder.
//!
//! The UI task runs a trampoline over [`State`] descriptors: each screen
//! runs until it has an answer, then returns a [`Transition`]. Operating
//! screens are flagged `is_main` and become the home target; dialogs that
//! finish normally return [`Transition::Home`].
//!
//! ## Screens
//!
//! - **CC load**: the operating screen, readouts plus setpoint adjustment
//! - **Menu**: generic list dialog, see [`menu`]
//! - **Readout config**: slot and kind pickers for the CC load screen
//! - **Contrast**: LCD contrast slider
//! - **Calibrate**: four step calibration wizard
//! - **Overtemp**: thermal fault banner
//!
//! Every screen that waits for input handles `Overtemp` by switching to
//! the overtemp screen.

mod calibration;
mod cc_load;
mod contrast;
pub mod input_logic;
pub mod menu;
mod overtemp;
mod readout_config;
mod splash;


pub use cc_load::draw_status;
pub use menu::{draw_menu, Menu, MenuItem};

use crate::config::{PRIMARY_BUTTON, SHOW_SPLASH};
use crate::control::{Analog, Control};
use crate::event::{EventKind, UiEvent};
use crate::lcd::Lcd;
use crate::pump::{EventPump, EventSource};
use crate::settings::{DisplaySettings, Settings};
use crate::storage::SettingsStore;

/// Screens the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Splash,
    CcLoad,
    /// List dialog whose items lead to other screens.
    Menu(&'static Menu<State>),
    ReadoutConfig,
    Contrast,
    Calibrate,
    Overtemp,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::CcLoad => "cc-load",
            Screen::Menu(_) => "menu",
            Screen::ReadoutConfig => "readout-config",
            Screen::Contrast => "contrast",
            Screen::Calibrate => "calibrate",
            Screen::Overtemp => "overtemp",
        }
    }
}

/// State descriptor: which screen to run and whether it is an operating
/// screen that becomes the new home.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    pub screen: Screen,
    pub is_main: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}(main={})", self.screen.name(), self.is_main)
    }
}

impl State {
    pub const fn main(screen: Screen) -> Self {
        Self {
            screen,
            is_main: true,
        }
    }

    pub const fn dialog(screen: Screen) -> Self {
        Self {
            screen,
            is_main: false,
        }
    }

    pub const SPLASH: State = State::dialog(Screen::Splash);
    pub const CC_LOAD: State = State::main(Screen::CcLoad);
    pub const MAIN_MENU: State = State::dialog(Screen::Menu(&menu::MAIN_MENU));
    pub const READOUT_CONFIG: State = State::dialog(Screen::ReadoutConfig);
    pub const CONTRAST: State = State::dialog(Screen::Contrast);
    pub const CALIBRATE: State = State::dialog(Screen::Calibrate);
    pub const OVERTEMP: State = State::dialog(Screen::Overtemp);
}

/// What a screen asks the trampoline to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    To(State),
    /// Return to the last operating screen.
    Home,
}

/// An overtemperature event interrupted a dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preempted;

impl From<Preempted> for Transition {
    fn from(_: Preempted) -> Self {
        Transition::To(State::OVERTEMP)
    }
}

/// The UI task context: collaborators plus trampoline state.
pub struct Ui<A, L, E, S> {
    control: Control<A>,
    lcd: L,
    events: EventPump<E>,
    store: S,
    display: DisplaySettings,
    state: State,
    main_state: State,
}

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    /// Load the stored records (factory defaults when absent) and take
    /// over the front end with the load at 0 A.
    pub async fn start(analog: A, mut lcd: L, events: E, mut store: S) -> Self {
        let settings = store.load_settings().await.unwrap_or_default();
        let display = store.load_display().await.unwrap_or_default();

        lcd.set_contrast(settings.contrast());
        let control = Control::new(analog, settings);

        let state = if SHOW_SPLASH {
            State::SPLASH
        } else {
            State::CC_LOAD
        };
        info!("UI start in {}", state.screen.name());

        Self {
            control,
            lcd,
            events: EventPump::new(events),
            store,
            display,
            state,
            main_state: State::CC_LOAD,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Last operating screen; target of [`Transition::Home`].
    pub fn main_state(&self) -> State {
        self.main_state
    }

    /// Run the current screen to completion and adopt its successor.
    pub async fn step(&mut self) {
        let transition = match self.state.screen {
            Screen::Splash => self.splash().await,
            Screen::CcLoad => self.cc_load().await,
            Screen::Menu(menu) => match self.run_menu(menu).await {
                Ok(next) => Transition::To(next),
                Err(preempted) => preempted.into(),
            },
            Screen::ReadoutConfig => self.readout_config().await,
            Screen::Contrast => self.contrast().await,
            Screen::Calibrate => self.calibrate().await,
            Screen::Overtemp => self.overtemp().await,
        };

        self.state = match transition {
            Transition::To(next) => next,
            Transition::Home => self.main_state,
        };
        if self.state.is_main {
            self.main_state = self.state;
        }
        debug!("UI -> {}", self.state.screen.name());
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    pub fn control(&self) -> &Control<A> {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut Control<A> {
        &mut self.control
    }

    pub fn lcd(&self) -> &L {
        &self.lcd
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn display_settings(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn events_mut(&mut self) -> &mut E {
        self.events.source_mut()
    }

    #[cfg(test)]
    pub(crate) fn goto(&mut self, state: State) {
        self.state = state;
        if state.is_main {
            self.main_state = state;
        }
    }

    async fn next_event(&mut self) -> UiEvent {
        self.lcd.flush();
        let event = self.events.next_event().await;
        trace!("event {:?} @ {}", event.kind, event.when);
        event
    }

    /// Block until the primary button is pressed.
    async fn wait_for_button(&mut self) -> Result<(), Preempted> {
        loop {
            let event = self.next_event().await;
            match event.kind {
                EventKind::ButtonPress(PRIMARY_BUTTON) => return Ok(()),
                EventKind::Overtemp => return Err(Preempted),
                _ => {}
            }
        }
    }

    /// Persist `settings` and adopt them. On a failed write the live
    /// settings stay as they were.
    async fn commit_settings(&mut self, settings: Settings) -> bool {
        match self.store.save_settings(&settings).await {
            Ok(()) => {
                self.control.apply_settings(settings);
                true
            }
            Err(_) => {
                error!("Settings not saved - keeping previous values");
                false
            }
        }
    }
}
