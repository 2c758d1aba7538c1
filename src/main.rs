//! Re:load firmware for nRF52840.
//!
//! Wires the encoder, the SSD1306 OLED, the analog front end and the NVMC
//! settings store to the UI core and runs the UI on the main task.

#![no_std]
#![no_main]

mod hw;

use defmt::{error, info};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive, Pin as _};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use embassy_nrf::saadc::{self, ChannelConfig, Saadc};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use reload::event::EventQueue;
use reload::storage::FlashStore;
use reload::ui::Ui;
use {defmt_rtt as _, panic_probe as _};

use hw::clock::QueueEvents;
use hw::front_end::FrontEnd;
use hw::oled::Oled;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// UI events from the input and thermal tasks.
static EVENTS: EventQueue = EventQueue::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Re:load starting...");

    let p = embassy_nrf::init(Default::default());

    // ═══════════════════════════════════════════════════════════════════
    // Input
    // ═══════════════════════════════════════════════════════════════════

    if let Err(e) = spawner.spawn(hw::input::encoder_task(
        p.P0_11.degrade(),
        p.P0_12.degrade(),
        &EVENTS,
    )) {
        error!("spawn encoder_task failed: {:?}", e);
    }
    if let Err(e) = spawner.spawn(hw::input::button_task(p.P0_24.degrade(), &EVENTS)) {
        error!("spawn button_task failed: {:?}", e);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Analog front end
    // ═══════════════════════════════════════════════════════════════════

    let saadc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [
            ChannelConfig::single_ended(p.P0_02),
            ChannelConfig::single_ended(p.P0_03),
            ChannelConfig::single_ended(p.P0_04),
            ChannelConfig::single_ended(p.P0_05),
            ChannelConfig::single_ended(p.P0_28),
            ChannelConfig::single_ended(p.P0_29),
        ],
    );
    let load_enable = Output::new(p.P0_15, Level::High, OutputDrive::Standard);
    if let Err(e) = spawner.spawn(hw::front_end::adc_task(saadc, load_enable, &EVENTS)) {
        error!("spawn adc_task failed: {:?}", e);
    }

    let mut dac = SimplePwm::new_1ch(p.PWM0, p.P0_13);
    dac.set_prescaler(Prescaler::Div1);
    let range = Output::new(p.P0_14, Level::Low, OutputDrive::Standard);
    let trim = [
        Output::new(p.P1_01, Level::Low, OutputDrive::Standard),
        Output::new(p.P1_02, Level::Low, OutputDrive::Standard),
        Output::new(p.P1_03, Level::Low, OutputDrive::Standard),
        Output::new(p.P1_04, Level::Low, OutputDrive::Standard),
        Output::new(p.P1_05, Level::Low, OutputDrive::Standard),
    ];
    let front_end = FrontEnd::new(dac, range, trim);

    // ═══════════════════════════════════════════════════════════════════
    // Display & settings
    // ═══════════════════════════════════════════════════════════════════

    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let lcd = Oled::new(i2c);

    let store = FlashStore::new(BlockingAsync::new(Nvmc::new(p.NVMC)));

    // ═══════════════════════════════════════════════════════════════════
    // UI
    // ═══════════════════════════════════════════════════════════════════

    let mut ui = Ui::start(front_end, lcd, QueueEvents::new(&EVENTS), store).await;
    info!("Re:load ready");
    ui.run().await
}
