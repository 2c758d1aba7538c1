//! Readout model: what each readout kind shows, rendered for the LCD.

use crate::control::{Analog, Control};
use crate::format::{format_number, format_resistance, pad, Readout};
use crate::settings::ReadoutKind;

/// Render one readout, padded to the 6-character envelope.
///
/// An empty slot renders as blanks so it overwrites whatever was there.
pub fn render<A: Analog>(kind: ReadoutKind, control: &Control<A>) -> Readout {
    let mut out = match kind {
        ReadoutKind::None => Readout::new(),
        ReadoutKind::CurrentSetpoint => format_number(control.current_setpoint(), 'A'),
        ReadoutKind::CurrentUsage => format_number(control.current_usage(), 'A'),
        ReadoutKind::Voltage => format_number(control.voltage(), 'V'),
        ReadoutKind::Power => format_number(control.power(), 'W'),
        ReadoutKind::Resistance => format_resistance(control.resistance()),
    };
    pad(&mut out);
    out
}
