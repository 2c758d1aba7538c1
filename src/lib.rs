//! UI and control core of the Re:load constant-current electronic load.
//!
//! Everything here is hardware independent: the analog front end, the LCD,
//! the scheduler and the settings store are collaborator traits, so the
//! whole UI runs on the host against simulated collaborators.
//!
//! Usage: `cargo test` on the host. The embedded binary (`src/main.rs`,
//! feature `embedded`) binds the traits to nRF52840 peripherals.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Core
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod control;
pub mod error;
pub mod event;
pub mod format;
pub mod input;
pub mod lcd;
pub mod pump;
pub mod readout;
pub mod settings;
pub mod storage;

// ═══════════════════════════════════════════════════════════════════════════
// User interface
// ═══════════════════════════════════════════════════════════════════════════

pub mod ui;

pub use error::Error;

#[cfg(test)]
mod sim;

// std critical-section impl for the embassy-sync queue on the host.
#[cfg(test)]
use critical_section as _;
