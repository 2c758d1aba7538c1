//! Display driver interface.
//!
//! The UI addresses the LCD as a grid of 8 rows (8 px pages) by 160
//! columns. Text glyphs are 12 columns wide and two rows high; the big
//! numerals used by the main readout span four rows.

use crate::config::GLYPH_WIDTH;

/// Special glyphs understood by the display driver.
pub mod glyph {
    pub const UP_ARROW: &str = "\u{2191}";
    pub const DOWN_ARROW: &str = "\u{2193}";
    pub const ENTER: &str = "\u{21b5}";
    pub const OHM: char = '\u{3a9}';
}

/// Display collaborator used by every screen.
///
/// Drawing never fails from the UI's point of view; drivers swallow bus
/// errors the same way a missed frame is tolerated.
pub trait Lcd {
    /// Blank the whole display.
    fn clear_all(&mut self);

    /// Fill rows `start_row..end_row`, columns `start_col..end_col` with a
    /// byte pattern (one byte covers a column of 8 px in a row).
    fn clear(&mut self, start_row: u8, start_col: u8, end_row: u8, end_col: u8, fill: u8);

    /// Draw text in the small font; `inverted` draws light on dark.
    fn draw_text(&mut self, row: u8, col: u8, text: &str, inverted: bool);

    /// Draw text in the large numeral font.
    fn draw_big_numbers(&mut self, row: u8, col: u8, text: &str);

    /// Set the LCD contrast (0..=63).
    fn set_contrast(&mut self, contrast: u8);

    /// Push pending drawing to the panel.
    fn flush(&mut self) {}
}

/// Columns occupied by `text` in the small font.
pub fn text_width(text: &str) -> u8 {
    let glyphs = text.chars().count().min((u8::MAX / GLYPH_WIDTH) as usize) as u8;
    glyphs * GLYPH_WIDTH
}
