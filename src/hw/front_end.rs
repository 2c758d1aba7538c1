//! Analog front end on nRF52840 peripherals.
//!
//! - Current DAC: PWM duty into an RC filter.
//! - Range select and the 5-bit opamp offset trim: GPIO outputs.
//! - ADC: SAADC sweep of all six channels every [`ADC_SAMPLE_PERIOD_MS`],
//!   published through atomics so the UI reads the latest values.
//! - Thermal monitor: runs with the sampler, cuts the load enable line and
//!   posts `Overtemp` when the temperature channel trips.

use core::sync::atomic::{AtomicI16, AtomicU8, Ordering};

use defmt::{info, warn};
use embassy_nrf::gpio::{Level, Output};
use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::saadc::Saadc;
use embassy_time::{Instant, Timer};
use reload::config::{ADC_SAMPLE_PERIOD_MS, OVERTEMP_RECOVER_COUNTS, OVERTEMP_TRIP_COUNTS};
use reload::control::{AdcChannel, Analog, CurrentRange, OutputMode};
use reload::event::{post, EventKind, EventQueue, UiEvent};

/// Channels in SAADC scan order (matches `AdcChannel` discriminants).
pub const ADC_CHANNELS: usize = AdcChannel::ALL.len();

/// PWM counter top; the DAC has this many steps.
pub const PWM_TOP: u16 = 4095;

static ADC_READINGS: [AtomicI16; ADC_CHANNELS] = [const { AtomicI16::new(0) }; ADC_CHANNELS];

static OUTPUT_MODE: AtomicU8 = AtomicU8::new(mode_to_u8(OutputMode::Feedback));

const fn mode_to_u8(mode: OutputMode) -> u8 {
    match mode {
        OutputMode::Off => 0,
        OutputMode::On => 1,
        OutputMode::Feedback => 2,
    }
}

fn load_mode() -> OutputMode {
    match OUTPUT_MODE.load(Ordering::Relaxed) {
        0 => OutputMode::Off,
        1 => OutputMode::On,
        _ => OutputMode::Feedback,
    }
}

fn store_mode(mode: OutputMode) {
    OUTPUT_MODE.store(mode_to_u8(mode), Ordering::Relaxed);
}

pub struct FrontEnd<'d> {
    dac: SimplePwm<'d, PWM0>,
    range: Output<'d>,
    trim: [Output<'d>; 5],
}

impl<'d> FrontEnd<'d> {
    pub fn new(mut dac: SimplePwm<'d, PWM0>, range: Output<'d>, trim: [Output<'d>; 5]) -> Self {
        dac.set_max_duty(PWM_TOP);
        dac.set_duty(0, 0);
        Self { dac, range, trim }
    }
}

impl Analog for FrontEnd<'_> {
    fn set_dac(&mut self, counts: u16) {
        self.dac.set_duty(0, counts.min(PWM_TOP));
    }

    fn set_current_range(&mut self, range: CurrentRange) {
        let level = match range {
            CurrentRange::Low => Level::Low,
            CurrentRange::Full => Level::High,
        };
        self.range.set_level(level);
    }

    fn set_opamp_offset_trim(&mut self, trim: u8) {
        for (bit, pin) in self.trim.iter_mut().enumerate() {
            pin.set_level(Level::from(trim & (1 << bit) != 0));
        }
    }

    fn adc_read(&self, channel: AdcChannel) -> i16 {
        ADC_READINGS[channel as usize].load(Ordering::Relaxed)
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        store_mode(mode);
    }

    fn output_mode(&self) -> OutputMode {
        load_mode()
    }
}

/// Sample the front end and guard the output stage.
#[embassy_executor::task]
pub async fn adc_task(
    mut saadc: Saadc<'static, ADC_CHANNELS>,
    mut load_enable: Output<'static>,
    queue: &'static EventQueue,
) -> ! {
    saadc.calibrate().await;
    info!("SAADC calibrated");

    let mut samples = [0i16; ADC_CHANNELS];
    let mut tripped = false;
    let mut overtemp_pending = false;

    loop {
        saadc.sample(&mut samples).await;
        for (slot, value) in ADC_READINGS.iter().zip(samples) {
            slot.store(value, Ordering::Relaxed);
        }

        let temp = samples[AdcChannel::Temp as usize];
        if temp > OVERTEMP_TRIP_COUNTS {
            if load_mode() != OutputMode::Off {
                warn!("Overtemp trip at {} counts", temp);
                store_mode(OutputMode::Off);
                tripped = true;
                overtemp_pending = true;
            }
        } else if tripped && temp < OVERTEMP_RECOVER_COUNTS {
            info!("Temperature back to {} counts - output re-enabled", temp);
            store_mode(OutputMode::Feedback);
            tripped = false;
        }

        // Retry until the UI queue has room.
        if overtemp_pending {
            let event = UiEvent::new(EventKind::Overtemp, Instant::now().as_millis());
            overtemp_pending = post(queue, event).is_err();
        }

        load_enable.set_level(Level::from(load_mode() != OutputMode::Off));

        Timer::after_millis(ADC_SAMPLE_PERIOD_MS).await;
    }
}
