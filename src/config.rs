//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, current limits, factory calibration defaults
//! and hardware pin assignments live here so they can be tuned in one place.

// Timing

/// Scheduler tick rate. Timestamps are milliseconds.
pub const TICK_RATE_HZ: u64 = 1000;

/// Maximum gap between two synthesized `AdcReading` events (ms).
/// Screens redraw at least this often while the user is idle.
pub const UI_TICK_PERIOD_MS: u64 = TICK_RATE_HZ / 10;

/// Minimum spacing between two accepted button presses (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = TICK_RATE_HZ / 10;

/// How long the splash screen stays up (ms).
pub const SPLASH_DURATION_MS: u64 = 3 * TICK_RATE_HZ;

/// Show the splash screen on boot. Debug builds skip it.
pub const SHOW_SPLASH: bool = cfg!(not(debug_assertions));

// Input

/// Capacity of the UI event queue. Producers drop events when it is full.
pub const EVENT_QUEUE_DEPTH: usize = 2;

/// Quadrature edges per mechanical encoder detent.
pub const EDGES_PER_DETENT: i8 = 4;

/// Button id of the encoder push-button.
pub const PRIMARY_BUTTON: u8 = 1;

// Current setpoint

/// Setpoint change per encoder detent in the low range (µA).
pub const CURRENT_LOWRANGE_STEP: i32 = 5_000;

/// Setpoint change per encoder detent in the full range (µA).
pub const CURRENT_FULLRANGE_STEP: i32 = 20_000;

/// Highest setpoint served by the low range (µA).
pub const CURRENT_LOWRANGE_MAX: i32 = 250_000;

/// Highest setpoint the load accepts (µA).
pub const CURRENT_FULLRANGE_MAX: i32 = 6_000_000;

// Calibration

/// Setpoint programmed while sweeping the opamp offset trim (µA).
pub const CAL_PROBE_CURRENT_UA: i32 = 100_000;

/// Settling time after each opamp trim change (ms).
pub const CAL_SETTLE_MS: u64 = 10;

/// Number of opamp offset trim settings (0..=31).
pub const OPAMP_TRIM_STEPS: u8 = 32;

/// One encoder detent scales a calibration gain by `1 + 1/500`.
pub const CAL_GAIN_STEP_DIVISOR: i32 = 500;

// Display

/// Text rows on the LCD (8 px pages; text lines use two rows).
pub const DISPLAY_ROWS: u8 = 8;

/// Pixel columns on the LCD.
pub const DISPLAY_COLUMNS: u8 = 160;

/// Width of one text glyph in columns.
pub const GLYPH_WIDTH: u8 = 12;

/// Largest contrast / backlight value the LCD accepts.
pub const CONTRAST_MAX: i32 = 0x3F;

// Factory defaults (used until a calibration has been stored)

/// Microamps per DAC count in the full range.
pub const DEFAULT_DAC_HIGH_GAIN: i32 = 21157;
/// Microamps per DAC count in the low range.
pub const DEFAULT_DAC_LOW_GAIN: i32 = 186;
pub const DEFAULT_DAC_OFFSET: i32 = 0;
/// Mid-scale opamp offset trim.
pub const DEFAULT_OPAMP_OFFSET_TRIM: i32 = 16;
pub const DEFAULT_ADC_CURRENT_OFFSET: i32 = -35;
/// Microamps per ADC count.
pub const DEFAULT_ADC_CURRENT_GAIN: i32 = 599;
pub const DEFAULT_ADC_VOLTAGE_OFFSET: i32 = 0;
/// Microvolts per ADC count.
pub const DEFAULT_ADC_VOLTAGE_GAIN: i32 = 2008;
pub const DEFAULT_BACKLIGHT_BRIGHTNESS: i32 = CONTRAST_MAX;
pub const DEFAULT_LCD_CONTRAST: i32 = 40;

// Settings storage

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 252;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

// Thermal protection

/// Raw temperature-channel reading above which the output is shut off.
pub const OVERTEMP_TRIP_COUNTS: i16 = 1800;

/// The front end re-enables the output once the reading drops below this.
pub const OVERTEMP_RECOVER_COUNTS: i16 = 1700;

/// Interval between front-end ADC sweeps (ms).
pub const ADC_SAMPLE_PERIOD_MS: u64 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` are
// picked in `main.rs`.  Adjust for your custom PCB.
//
//   Encoder A        → P0.11
//   Encoder B        → P0.12
//   Encoder button   → P0.24
//   I²C SDA          → P0.26
//   I²C SCL          → P0.27
//   Current DAC PWM  → P0.13
//   Range select     → P0.14
//   Load enable      → P0.15
//   Opamp trim 0..4  → P1.01..P1.05
//   Front-end ADC    → AIN0..AIN5 (P0.02..P0.05, P0.28, P0.29)
