//! SSD1306 OLED as the UI's LCD.
//!
//! The UI draws on a 160-column grid of 8 px pages; columns are scaled to
//! the panel's 128 pixels. Text uses a 9×15 font (two pages per line) and
//! the main readout a 10×20 font.

use embedded_graphics::mono_font::iso_8859_7::{FONT_10X20, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use reload::config::CONTRAST_MAX;
use reload::lcd::Lcd;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Panel pixel x of a grid column.
fn x(col: u8) -> i32 {
    col as i32 * 4 / 5
}

/// Panel pixel y of a page.
fn y(row: u8) -> i32 {
    row as i32 * 8
}

fn text_style(font: &'static MonoFont<'static>, inverted: bool) -> MonoTextStyle<'static, BinaryColor> {
    let (fg, bg) = if inverted {
        (BinaryColor::Off, BinaryColor::On)
    } else {
        (BinaryColor::On, BinaryColor::Off)
    };
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(fg)
        .background_color(bg)
        .build()
}

/// Swap the arrow and enter glyphs for characters the font has.
fn to_font(text: &str) -> heapless::String<32> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        let c = match c {
            '\u{2191}' => '^',
            '\u{2193}' => 'v',
            '\u{21b5}' => '>',
            other => other,
        };
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

pub struct Oled<I2C> {
    display: Display<I2C>,
}

impl<I2C: I2c> Oled<I2C> {
    /// Initialise the SSD1306 display and clear the screen.
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let _ = display.init();
        display.clear_buffer();
        let _ = display.flush();
        Self { display }
    }

    fn text(&mut self, font: &'static MonoFont<'static>, row: u8, col: u8, text: &str, inverted: bool) {
        let _ = Text::with_baseline(
            &to_font(text),
            Point::new(x(col), y(row)),
            text_style(font, inverted),
            Baseline::Top,
        )
        .draw(&mut self.display);
    }
}

impl<I2C: I2c> Lcd for Oled<I2C> {
    fn clear_all(&mut self) {
        self.display.clear_buffer();
    }

    fn clear(&mut self, start_row: u8, start_col: u8, end_row: u8, end_col: u8, fill: u8) {
        if end_col <= start_col {
            return;
        }
        let width = (x(end_col) - x(start_col)) as u32;
        for row in start_row..end_row {
            // One fill byte is a vertical strip of 8 px, LSB on top.
            for bit in 0..8u8 {
                let color = if fill & (1 << bit) != 0 {
                    BinaryColor::On
                } else {
                    BinaryColor::Off
                };
                let _ = Rectangle::new(
                    Point::new(x(start_col), y(row) + bit as i32),
                    Size::new(width, 1),
                )
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut self.display);
            }
        }
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str, inverted: bool) {
        self.text(&FONT_9X15, row, col, text, inverted);
    }

    fn draw_big_numbers(&mut self, row: u8, col: u8, text: &str) {
        self.text(&FONT_10X20, row, col, text, false);
    }

    fn set_contrast(&mut self, contrast: u8) {
        let contrast = contrast.min(CONTRAST_MAX as u8);
        let _ = self
            .display
            .set_brightness(Brightness::custom(0x2, contrast * 4));
    }

    fn flush(&mut self) {
        let _ = self.display.flush();
    }
}
