//! Simulated collaborators for host tests: analog front end, scheduler
//! with a virtual clock, recording LCD, in-memory settings store and a
//! RAM-backed NOR flash.

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embedded_storage_async::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

use crate::control::{AdcChannel, Analog, CurrentRange, OutputMode};
use crate::error::Error;
use crate::event::{EventKind, UiEvent};
use crate::lcd::Lcd;
use crate::pump::EventSource;
use crate::settings::{DisplaySettings, Settings};
use crate::storage::SettingsStore;

// ═══════════════════════════════════════════════════════════════════════════
// Analog front end
// ═══════════════════════════════════════════════════════════════════════════

pub struct SimAnalog {
    pub raw: [i16; 6],
    pub dac: u16,
    pub range: CurrentRange,
    pub trim: u8,
    /// Every trim value programmed, in order.
    pub trim_history: Vec<u8>,
    pub mode: OutputMode,
    /// When set, the current-sense channel reads `current_set + residual(trim)`.
    pub trim_residual: Option<fn(u8) -> i16>,
}

impl Default for SimAnalog {
    fn default() -> Self {
        Self {
            raw: [0; 6],
            dac: 0,
            range: CurrentRange::Low,
            trim: 0,
            trim_history: Vec::new(),
            mode: OutputMode::Feedback,
            trim_residual: None,
        }
    }
}

impl SimAnalog {
    pub fn set_raw(&mut self, channel: AdcChannel, value: i16) {
        self.raw[channel as usize] = value;
    }
}

impl Analog for SimAnalog {
    fn set_dac(&mut self, counts: u16) {
        self.dac = counts;
    }

    fn set_current_range(&mut self, range: CurrentRange) {
        self.range = range;
    }

    fn set_opamp_offset_trim(&mut self, trim: u8) {
        self.trim = trim;
        self.trim_history.push(trim);
    }

    fn adc_read(&self, channel: AdcChannel) -> i16 {
        match (channel, self.trim_residual) {
            (AdcChannel::CurrentSense, Some(residual)) => {
                self.raw[AdcChannel::CurrentSet as usize] + residual(self.trim)
            }
            _ => self.raw[channel as usize],
        }
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn output_mode(&self) -> OutputMode {
        self.mode
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scheduler
// ═══════════════════════════════════════════════════════════════════════════

/// Idle timeouts tolerated once the script has run dry.
const IDLE_BUDGET: usize = 200;

/// Scripted event queue with a virtual millisecond clock.
///
/// Receiving advances the clock to the next scheduled event or by the
/// full timeout. A screen that keeps waiting after the script has run dry
/// trips a panic instead of spinning forever.
pub struct SimEvents {
    pub now: u64,
    tail: u64,
    pending: VecDeque<(u64, EventKind)>,
    idle: usize,
}

impl SimEvents {
    pub fn new() -> Self {
        Self {
            now: 0,
            tail: 0,
            pending: VecDeque::new(),
            idle: 0,
        }
    }

    /// Queue an event right after the previously scheduled one.
    pub fn push(&mut self, kind: EventKind) {
        self.push_after(0, kind);
    }

    /// Queue an event `ms` after the previously scheduled one.
    pub fn push_after(&mut self, ms: u64, kind: EventKind) {
        self.tail = self.tail.max(self.now) + ms;
        self.pending.push_back((self.tail, kind));
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for SimEvents {
    fn now_ms(&self) -> u64 {
        self.now
    }

    async fn receive(&mut self, timeout_ms: u64) -> Option<UiEvent> {
        if let Some(&(at, kind)) = self.pending.front() {
            if at <= self.now + timeout_ms {
                self.pending.pop_front();
                self.now = self.now.max(at);
                self.idle = 0;
                return Some(UiEvent::new(kind, self.now));
            }
        } else {
            self.idle += 1;
            assert!(self.idle <= IDLE_BUDGET, "event script exhausted");
        }
        self.now += timeout_ms;
        None
    }

    async fn delay_ms(&mut self, ms: u64) {
        self.now += ms;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LCD
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct DrawnText {
    pub row: u8,
    pub col: u8,
    pub text: String,
    pub inverted: bool,
}

/// LCD that records what was drawn.
#[derive(Default)]
pub struct FakeLcd {
    pub texts: Vec<DrawnText>,
    pub big: Vec<DrawnText>,
    pub contrast: Option<u8>,
    pub clear_alls: usize,
}

impl FakeLcd {
    /// True if `needle` was ever drawn, in either font.
    pub fn shows(&self, needle: &str) -> bool {
        self.texts
            .iter()
            .chain(self.big.iter())
            .any(|t| t.text.contains(needle))
    }

    /// Most recent text drawn at a position.
    pub fn last_at(&self, row: u8, col: u8) -> Option<&DrawnText> {
        self.texts
            .iter()
            .rev()
            .find(|t| t.row == row && t.col == col)
    }

    pub fn forget(&mut self) {
        self.texts.clear();
        self.big.clear();
    }
}

impl Lcd for FakeLcd {
    fn clear_all(&mut self) {
        self.clear_alls += 1;
    }

    fn clear(&mut self, _start_row: u8, _start_col: u8, _end_row: u8, _end_col: u8, _fill: u8) {}

    fn draw_text(&mut self, row: u8, col: u8, text: &str, inverted: bool) {
        self.texts.push(DrawnText {
            row,
            col,
            text: text.into(),
            inverted,
        });
    }

    fn draw_big_numbers(&mut self, row: u8, col: u8, text: &str) {
        self.big.push(DrawnText {
            row,
            col,
            text: text.into(),
            inverted: false,
        });
    }

    fn set_contrast(&mut self, contrast: u8) {
        self.contrast = Some(contrast);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Settings store
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MemStore {
    pub settings: Option<Settings>,
    pub display: Option<DisplaySettings>,
    pub settings_writes: usize,
    pub display_writes: usize,
    pub fail_writes: bool,
}

impl SettingsStore for MemStore {
    async fn load_settings(&mut self) -> Option<Settings> {
        self.settings
    }

    async fn save_settings(&mut self, settings: &Settings) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::Storage);
        }
        self.settings = Some(*settings);
        self.settings_writes += 1;
        Ok(())
    }

    async fn load_display(&mut self) -> Option<DisplaySettings> {
        self.display
    }

    async fn save_display(&mut self, display: &DisplaySettings) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::Storage);
        }
        self.display = Some(*display);
        self.display_writes += 1;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// NOR flash
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct RamFlashError(NorFlashErrorKind);

impl NorFlashError for RamFlashError {
    fn kind(&self) -> NorFlashErrorKind {
        self.0
    }
}

/// Four 4 KB pages of RAM with NOR semantics (erase to 0xFF, writes clear bits).
pub struct RamFlash {
    mem: Vec<u8>,
}

impl RamFlash {
    pub const CAPACITY: usize = 4 * 4096;

    pub fn new() -> Self {
        Self {
            mem: vec![0xFF; Self::CAPACITY],
        }
    }

    fn check(&self, offset: u32, len: usize, align: usize) -> Result<usize, RamFlashError> {
        let start = offset as usize;
        if start % align != 0 || len % align != 0 {
            return Err(RamFlashError(NorFlashErrorKind::NotAligned));
        }
        if start + len > self.mem.len() {
            return Err(RamFlashError(NorFlashErrorKind::OutOfBounds));
        }
        Ok(start)
    }
}

impl ErrorType for RamFlash {
    type Error = RamFlashError;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 4;

    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = self.check(offset, bytes.len(), Self::READ_SIZE)?;
        bytes.copy_from_slice(&self.mem[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.mem.len()
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = 4096;

    async fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let start = self.check(from, (to - from) as usize, Self::ERASE_SIZE)?;
        self.mem[start..to as usize].fill(0xFF);
        Ok(())
    }

    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = self.check(offset, bytes.len(), Self::WRITE_SIZE)?;
        for (cell, b) in self.mem[start..start + bytes.len()].iter_mut().zip(bytes) {
            *cell &= *b;
        }
        Ok(())
    }
}
