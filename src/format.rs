//! Fixed-width engineering notation for readouts.
//!
//! Every readout fits a 6-character envelope (unit included) so screens can
//! lay out fields without measuring them.

use core::fmt::Write;

use crate::lcd::glyph;

/// Characters in one formatted readout.
pub const READOUT_WIDTH: usize = 6;

/// Formatted readout. Sized in bytes for multi-byte glyphs such as `Ω`.
pub type Readout = heapless::String<16>;

/// Format a value given in micro-units, e.g. µA into `"12.5mA"`.
///
/// Negative values clamp to zero. The value is scaled by 1000 until the
/// whole part has at most three digits, choosing the milli, base or kilo
/// prefix on the way.
pub fn format_number(value: i32, suffix: char) -> Readout {
    let mut num = value.max(0);
    let mut magnitude = 1;
    while num >= 1_000_000 {
        num /= 1000;
        magnitude += 1;
    }

    let whole = num / 1000;
    let remainder = num % 1000;

    let mut out = Readout::new();
    let _ = if whole < 10 {
        write!(out, "{}.{:02}", whole, remainder / 10)
    } else if whole < 100 {
        write!(out, "{:02}.{}", whole, remainder / 100)
    } else {
        write!(out, "{:03}", whole)
    };

    match magnitude {
        1 => {
            let _ = out.push('m');
        }
        3 => {
            let _ = out.push('k');
        }
        _ => {}
    }
    let _ = out.push(suffix);
    pad(&mut out);
    out
}

/// Format a resistance in micro-ohms; `None` means no current flows.
pub fn format_resistance(micro_ohms: Option<i32>) -> Readout {
    match micro_ohms {
        Some(value) => format_number(value, glyph::OHM),
        None => {
            let mut out = Readout::new();
            let _ = out.push_str("----");
            let _ = out.push(glyph::OHM);
            out
        }
    }
}

/// Pad with trailing spaces up to the readout envelope.
pub fn pad(out: &mut Readout) {
    while out.chars().count() < READOUT_WIDTH {
        if out.push(' ').is_err() {
            break;
        }
    }
}
