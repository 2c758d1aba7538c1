//! List dialogs: the main menu and the readout pickers.

use super::input_logic::{apply_detents, page_start};
use super::{Preempted, State, Ui};
use crate::config::{DISPLAY_COLUMNS, DISPLAY_ROWS, PRIMARY_BUTTON};
use crate::control::Analog;
use crate::event::{EventKind, UiEvent};
use crate::lcd::{glyph, text_width, Lcd};
use crate::pump::EventSource;
use crate::settings::ReadoutKind;
use crate::storage::SettingsStore;

/// Column of the scroll arrows.
const ARROW_COL: u8 = 148;

/// Right edge of the highlight bar.
const HIGHLIGHT_END_COL: u8 = 142;

#[derive(Debug, PartialEq, Eq)]
pub struct MenuItem<T: 'static> {
    pub caption: &'static str,
    pub value: T,
}

/// A list dialog. `value` of the chosen item is the dialog's answer.
#[derive(Debug, PartialEq, Eq)]
pub struct Menu<T: 'static> {
    pub title: Option<&'static str>,
    pub items: &'static [MenuItem<T>],
}

pub const MAIN_MENU: Menu<State> = Menu {
    title: None,
    items: &[
        MenuItem {
            caption: "C/C Load",
            value: State::CC_LOAD,
        },
        MenuItem {
            caption: "Readouts",
            value: State::READOUT_CONFIG,
        },
        MenuItem {
            caption: "Contrast",
            value: State::CONTRAST,
        },
        MenuItem {
            caption: "Calibrate",
            value: State::CALIBRATE,
        },
    ],
};

/// Readout slots of the CC load screen, by index.
pub const CHOOSE_SLOT_MENU: Menu<usize> = Menu {
    title: Some("Readouts"),
    items: &[
        MenuItem {
            caption: "Main display",
            value: 0,
        },
        MenuItem {
            caption: "Left display",
            value: 1,
        },
        MenuItem {
            caption: "Right display",
            value: 2,
        },
    ],
};

pub const READOUT_MENU: Menu<ReadoutKind> = Menu {
    title: Some("Choose value"),
    items: &[
        MenuItem {
            caption: "Set Current",
            value: ReadoutKind::CurrentSetpoint,
        },
        MenuItem {
            caption: "Act. Current",
            value: ReadoutKind::CurrentUsage,
        },
        MenuItem {
            caption: "Voltage",
            value: ReadoutKind::Voltage,
        },
        MenuItem {
            caption: "Power",
            value: ReadoutKind::Power,
        },
        MenuItem {
            caption: "Resistance",
            value: ReadoutKind::Resistance,
        },
        MenuItem {
            caption: "None",
            value: ReadoutKind::None,
        },
    ],
};

/// Draw a menu with `selected` highlighted.
///
/// Text lines are two rows high. With a title the first line is the
/// title band and three item lines remain, otherwise four. Only the page
/// holding the selection is drawn; arrows mark hidden items above/below.
pub fn draw_menu<L: Lcd, T>(lcd: &mut L, menu: &Menu<T>, selected: usize) {
    let mut start_row = 0u8;
    let mut height = (DISPLAY_ROWS / 2) as usize;

    if let Some(title) = menu.title {
        let padding = DISPLAY_COLUMNS.saturating_sub(text_width(title)) / 2;
        lcd.clear(0, 0, 2, padding, 0xFF);
        lcd.draw_text(0, padding, title, true);
        lcd.clear(0, DISPLAY_COLUMNS - padding, 2, DISPLAY_COLUMNS, 0xFF);
        start_row = 1;
        height -= 1;
    }

    let first = page_start(selected, height);
    let up = if first > 0 { glyph::UP_ARROW } else { " " };
    lcd.draw_text(start_row * 2, ARROW_COL, up, false);

    for line in 0..height {
        let row = (start_row + line as u8) * 2;
        match menu.items.get(first + line) {
            Some(item) => {
                let highlighted = first + line == selected;
                lcd.draw_text(row, 0, item.caption, highlighted);
                let fill = if highlighted { 0xFF } else { 0x00 };
                lcd.clear(row, text_width(item.caption), row + 2, HIGHLIGHT_END_COL, fill);
            }
            None => lcd.clear(row, 0, row + 2, DISPLAY_COLUMNS, 0),
        }
    }

    let down = if menu.items.len() > first + height {
        glyph::DOWN_ARROW
    } else {
        " "
    };
    lcd.draw_text(DISPLAY_ROWS - 2, ARROW_COL, down, false);
}

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    /// Run a list dialog until an item is chosen with the primary button.
    pub(super) async fn run_menu<T: Copy>(&mut self, menu: &Menu<T>) -> Result<T, Preempted> {
        self.lcd.clear_all();

        let mut selected = 0;
        loop {
            draw_menu(&mut self.lcd, menu, selected);
            let UiEvent { kind, .. } = self.next_event().await;
            match kind {
                EventKind::UpDown(detents) => {
                    selected = apply_detents(selected, detents, menu.items.len());
                }
                EventKind::ButtonPress(PRIMARY_BUTTON) => {
                    if let Some(item) = menu.items.get(selected) {
                        debug!("Menu: picked {}", item.caption);
                        return Ok(item.value);
                    }
                }
                EventKind::Overtemp => return Err(Preempted),
                _ => {}
            }
        }
    }
}
