//! Persistent storage for settings and readout layout.
//!
//! Uses NOR flash via the `sequential-storage` crate. Each record is a
//! serialized byte image stored under its own key in a key-value map;
//! `sequential-storage` appends new versions and handles wear levelling
//! and GC, so an interrupted write leaves the previous record readable.
//!
//! Storage layout:
//!   - `KEY_SETTINGS`: [`Settings`] image (calibration + LCD preferences).
//!   - `KEY_DISPLAY`: [`DisplaySettings`] image (readout slots).

use core::ops::Range;

use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use crate::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use crate::error::Error;
use crate::settings::{DisplaySettings, Settings, DISPLAY_RECORD_LEN, SETTINGS_RECORD_LEN};

/// Flash page size for nRF52840 (4 KB).
pub const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
pub const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
pub const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key of the settings record.
const KEY_SETTINGS: u8 = 0x01;

/// Key of the readout layout record.
const KEY_DISPLAY: u8 = 0x02;

/// Scratch buffer for map operations: largest record plus item header slack.
const BUFFER_SIZE: usize = 128;

/// Settings persistence used by the UI.
///
/// A successful `save_*` call is durable when it returns. Readers see
/// either the previous or the new record, never a mix.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    async fn load_settings(&mut self) -> Option<Settings>;
    async fn save_settings(&mut self, settings: &Settings) -> Result<(), Error>;
    async fn load_display(&mut self) -> Option<DisplaySettings>;
    async fn save_display(&mut self, display: &DisplaySettings) -> Result<(), Error>;
}

/// [`SettingsStore`] backed by a NOR flash region.
pub struct FlashStore<F> {
    flash: F,
    range: Range<u32>,
}

impl<F: NorFlash> FlashStore<F> {
    /// Store in the default region (`STORAGE_START..STORAGE_END`).
    pub fn new(flash: F) -> Self {
        Self::with_range(flash, STORAGE_START..STORAGE_END)
    }

    pub fn with_range(flash: F, range: Range<u32>) -> Self {
        Self { flash, range }
    }

    async fn fetch<'b>(&mut self, key: u8, buf: &'b mut [u8]) -> Result<Option<&'b [u8]>, Error> {
        fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            buf,
            &key,
        )
        .await
        .map_err(|_| Error::Storage)
    }

    async fn store(&mut self, key: u8, item: &[u8]) -> Result<(), Error> {
        let mut buf = [0u8; BUFFER_SIZE];
        store_item::<u8, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buf,
            &key,
            &item,
        )
        .await
        .map_err(|_| Error::Storage)
    }
}

impl<F: NorFlash> SettingsStore for FlashStore<F> {
    async fn load_settings(&mut self) -> Option<Settings> {
        let mut buf = [0u8; BUFFER_SIZE];
        match self.fetch(KEY_SETTINGS, &mut buf).await {
            Ok(Some(data)) => match Settings::from_bytes(data) {
                Ok(settings) => {
                    info!("Loaded settings from flash");
                    Some(settings)
                }
                Err(_) => {
                    warn!("Stored settings have an unknown layout - using defaults");
                    None
                }
            },
            Ok(None) => {
                info!("No settings in flash");
                None
            }
            Err(_) => {
                error!("Flash read error (settings)");
                None
            }
        }
    }

    async fn save_settings(&mut self, settings: &Settings) -> Result<(), Error> {
        let image: [u8; SETTINGS_RECORD_LEN] = settings.to_bytes();
        match self.store(KEY_SETTINGS, &image).await {
            Ok(()) => {
                info!("Saved settings to flash");
                Ok(())
            }
            Err(e) => {
                error!("Flash write error (settings)");
                Err(e)
            }
        }
    }

    async fn load_display(&mut self) -> Option<DisplaySettings> {
        let mut buf = [0u8; BUFFER_SIZE];
        match self.fetch(KEY_DISPLAY, &mut buf).await {
            Ok(Some(data)) => DisplaySettings::from_bytes(data).ok(),
            Ok(None) => None,
            Err(_) => {
                error!("Flash read error (display)");
                None
            }
        }
    }

    async fn save_display(&mut self, display: &DisplaySettings) -> Result<(), Error> {
        let image: [u8; DISPLAY_RECORD_LEN] = display.to_bytes();
        self.store(KEY_DISPLAY, &image).await.inspect_err(|_| {
            error!("Flash write error (display)");
        })
    }
}
