//! Persisted settings: calibration constants, LCD preferences and the
//! readout layout of the operating screen.
//!
//! Both records serialize to a fixed little-endian image prefixed with a
//! format version byte. An image with an unexpected version or length is
//! rejected and the caller falls back to factory defaults.

use crate::config::*;
use crate::error::Error;

/// Bump when the byte layout of a record changes.
pub const SETTINGS_FORMAT_VERSION: u8 = 1;

/// Number of `i32` fields in [`Settings`].
const SETTINGS_FIELDS: usize = 11;

/// Serialized size of [`Settings`].
pub const SETTINGS_RECORD_LEN: usize = 1 + SETTINGS_FIELDS * 4;

/// Serialized size of [`DisplaySettings`].
pub const DISPLAY_RECORD_LEN: usize = 1 + READOUT_SLOTS;

/// Readout slots per operating screen: one large, two small.
pub const READOUT_SLOTS: usize = 3;

/// Calibration constants and LCD preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Microamps per DAC count, low range.
    pub dac_low_gain: i32,
    /// Microamps per DAC count, full range.
    pub dac_high_gain: i32,
    /// DAC counts, low range.
    pub dac_low_offset: i32,
    /// DAC counts, full range.
    pub dac_high_offset: i32,
    /// Opamp offset trim (0..=31).
    pub opamp_offset_trim: i32,
    /// ADC current reading offset in counts.
    pub adc_current_offset: i32,
    /// Microamps per ADC count.
    pub adc_current_gain: i32,
    /// ADC voltage reading offset in counts.
    pub adc_voltage_offset: i32,
    /// Microvolts per ADC count.
    pub adc_voltage_gain: i32,
    /// 0..=63
    pub backlight_brightness: i32,
    /// 0..=63
    pub lcd_contrast: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dac_low_gain: DEFAULT_DAC_LOW_GAIN,
            dac_high_gain: DEFAULT_DAC_HIGH_GAIN,
            dac_low_offset: DEFAULT_DAC_OFFSET,
            dac_high_offset: DEFAULT_DAC_OFFSET,
            opamp_offset_trim: DEFAULT_OPAMP_OFFSET_TRIM,
            adc_current_offset: DEFAULT_ADC_CURRENT_OFFSET,
            adc_current_gain: DEFAULT_ADC_CURRENT_GAIN,
            adc_voltage_offset: DEFAULT_ADC_VOLTAGE_OFFSET,
            adc_voltage_gain: DEFAULT_ADC_VOLTAGE_GAIN,
            backlight_brightness: DEFAULT_BACKLIGHT_BRIGHTNESS,
            lcd_contrast: DEFAULT_LCD_CONTRAST,
        }
    }
}

impl Settings {
    fn fields(&self) -> [i32; SETTINGS_FIELDS] {
        [
            self.dac_low_gain,
            self.dac_high_gain,
            self.dac_low_offset,
            self.dac_high_offset,
            self.opamp_offset_trim,
            self.adc_current_offset,
            self.adc_current_gain,
            self.adc_voltage_offset,
            self.adc_voltage_gain,
            self.backlight_brightness,
            self.lcd_contrast,
        ]
    }

    /// Serialize into the flash record image.
    pub fn to_bytes(&self) -> [u8; SETTINGS_RECORD_LEN] {
        let mut buf = [0u8; SETTINGS_RECORD_LEN];
        buf[0] = SETTINGS_FORMAT_VERSION;
        for (chunk, field) in buf[1..].chunks_exact_mut(4).zip(self.fields()) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        buf
    }

    /// Parse a flash record image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != SETTINGS_RECORD_LEN || data[0] != SETTINGS_FORMAT_VERSION {
            return Err(Error::CorruptRecord);
        }

        let mut f = [0i32; SETTINGS_FIELDS];
        for (field, chunk) in f.iter_mut().zip(data[1..].chunks_exact(4)) {
            *field = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Ok(Self {
            dac_low_gain: f[0],
            dac_high_gain: f[1],
            dac_low_offset: f[2],
            dac_high_offset: f[3],
            opamp_offset_trim: f[4],
            adc_current_offset: f[5],
            adc_current_gain: f[6],
            adc_voltage_offset: f[7],
            adc_voltage_gain: f[8],
            backlight_brightness: f[9],
            lcd_contrast: f[10],
        })
    }

    /// Contrast as the LCD wants it.
    pub fn contrast(&self) -> u8 {
        self.lcd_contrast.clamp(0, CONTRAST_MAX) as u8
    }
}

/// What a readout slot shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReadoutKind {
    None = 0,
    CurrentSetpoint = 1,
    CurrentUsage = 2,
    Voltage = 3,
    Power = 4,
    Resistance = 5,
}

impl ReadoutKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ReadoutKind::None),
            1 => Some(ReadoutKind::CurrentSetpoint),
            2 => Some(ReadoutKind::CurrentUsage),
            3 => Some(ReadoutKind::Voltage),
            4 => Some(ReadoutKind::Power),
            5 => Some(ReadoutKind::Resistance),
            _ => None,
        }
    }

    /// Tag drawn next to the large readout.
    pub fn label(self) -> &'static str {
        match self {
            ReadoutKind::CurrentSetpoint => "SET",
            ReadoutKind::CurrentUsage => "ACT",
            _ => "",
        }
    }
}

/// Readout layout of one operating screen. Slot 0 is the large readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub readouts: [ReadoutKind; READOUT_SLOTS],
}

/// Layouts for all operating screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplaySettings {
    pub cc: DisplayConfig,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            cc: DisplayConfig {
                readouts: [
                    ReadoutKind::CurrentSetpoint,
                    ReadoutKind::CurrentUsage,
                    ReadoutKind::Voltage,
                ],
            },
        }
    }
}

impl DisplaySettings {
    pub fn to_bytes(&self) -> [u8; DISPLAY_RECORD_LEN] {
        let mut buf = [0u8; DISPLAY_RECORD_LEN];
        buf[0] = SETTINGS_FORMAT_VERSION;
        for (b, kind) in buf[1..].iter_mut().zip(self.cc.readouts) {
            *b = kind as u8;
        }
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != DISPLAY_RECORD_LEN || data[0] != SETTINGS_FORMAT_VERSION {
            return Err(Error::CorruptRecord);
        }

        let mut readouts = [ReadoutKind::None; READOUT_SLOTS];
        for (slot, &b) in readouts.iter_mut().zip(&data[1..]) {
            *slot = ReadoutKind::from_u8(b).ok_or(Error::CorruptRecord)?;
        }
        Ok(Self {
            cc: DisplayConfig { readouts },
        })
    }
}
