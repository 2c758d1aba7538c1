//! Control facade over the analog front end.
//!
//! Owns the live setpoint/range state and the cached settings, and turns
//! raw ADC counts into engineering units. Only the UI task touches it.

use crate::config::{
    CURRENT_FULLRANGE_MAX, CURRENT_FULLRANGE_STEP, CURRENT_LOWRANGE_MAX, CURRENT_LOWRANGE_STEP,
    OPAMP_TRIM_STEPS,
};
use crate::settings::Settings;

/// Front-end ADC channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    CurrentSense = 0,
    VoltageSense = 1,
    OpampOut = 2,
    FetIn = 3,
    Temp = 4,
    CurrentSet = 5,
}

impl AdcChannel {
    pub const ALL: [AdcChannel; 6] = [
        AdcChannel::CurrentSense,
        AdcChannel::VoltageSense,
        AdcChannel::OpampOut,
        AdcChannel::FetIn,
        AdcChannel::Temp,
        AdcChannel::CurrentSet,
    ];
}

/// Current range. Selects the DAC gain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentRange {
    /// Up to 250 mA, fine steps.
    Low = 0,
    /// Up to 6 A, coarse steps.
    Full = 1,
}

/// Output stage mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    Off,
    On,
    /// Closed-loop current regulation.
    Feedback,
}

/// Analog front end: current DAC, range switch, opamp trim and ADC.
pub trait Analog {
    fn set_dac(&mut self, counts: u16);
    fn set_current_range(&mut self, range: CurrentRange);
    /// Program the opamp offset trim register (0..=31).
    fn set_opamp_offset_trim(&mut self, trim: u8);
    /// Latest raw reading of a channel.
    fn adc_read(&self, channel: AdcChannel) -> i16;
    fn set_output_mode(&mut self, mode: OutputMode);
    fn output_mode(&self) -> OutputMode;
}

/// Live control state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LiveState {
    pub current_setpoint: i32,
    pub current_range: CurrentRange,
}

/// Range that serves a (clamped) setpoint.
pub fn range_for(setpoint: i32) -> CurrentRange {
    if setpoint <= CURRENT_LOWRANGE_MAX {
        CurrentRange::Low
    } else {
        CurrentRange::Full
    }
}

/// DAC counts for a setpoint in the given range.
pub fn dac_counts(setpoint: i32, range: CurrentRange, settings: &Settings) -> u16 {
    let (gain, offset) = match range {
        CurrentRange::Low => (settings.dac_low_gain, settings.dac_low_offset),
        CurrentRange::Full => (settings.dac_high_gain, settings.dac_high_offset),
    };
    if gain <= 0 {
        return 0;
    }
    (setpoint / gain + offset).clamp(0, u16::MAX as i32) as u16
}

/// Opamp trim register value for a stored trim setting.
pub fn trim_register(trim: i32) -> u8 {
    trim.clamp(0, OPAMP_TRIM_STEPS as i32 - 1) as u8
}

pub struct Control<A> {
    analog: A,
    live: LiveState,
    settings: Settings,
}

impl<A: Analog> Control<A> {
    /// Take over the front end with the load at 0 A.
    pub fn new(analog: A, settings: Settings) -> Self {
        let mut control = Self {
            analog,
            live: LiveState {
                current_setpoint: 0,
                current_range: CurrentRange::Low,
            },
            settings,
        };
        control.apply_settings(settings);
        control
    }

    /// Clamp, pick the range and program the DAC.
    pub fn set_current(&mut self, setpoint: i32) {
        let setpoint = setpoint.clamp(0, CURRENT_FULLRANGE_MAX);
        let range = range_for(setpoint);

        self.live = LiveState {
            current_setpoint: setpoint,
            current_range: range,
        };
        self.analog.set_current_range(range);
        self.analog.set_dac(dac_counts(setpoint, range, &self.settings));
    }

    /// Move the setpoint by encoder detents using the step of the active range.
    pub fn adjust_current(&mut self, detents: i32) {
        let step = match self.live.current_range {
            CurrentRange::Low => CURRENT_LOWRANGE_STEP,
            CurrentRange::Full => CURRENT_FULLRANGE_STEP,
        };
        let target = self
            .live
            .current_setpoint
            .saturating_add(detents.saturating_mul(step));
        self.set_current(target);
    }

    pub fn current_setpoint(&self) -> i32 {
        self.live.current_setpoint
    }

    pub fn current_range(&self) -> CurrentRange {
        self.live.current_range
    }

    pub fn raw_current_usage(&self) -> i16 {
        self.analog.adc_read(AdcChannel::CurrentSense)
    }

    /// Measured current in µA.
    pub fn current_usage(&self) -> i32 {
        (self.raw_current_usage() as i32 - self.settings.adc_current_offset)
            .saturating_mul(self.settings.adc_current_gain)
    }

    pub fn raw_voltage(&self) -> i16 {
        self.analog.adc_read(AdcChannel::VoltageSense)
    }

    /// Measured terminal voltage in µV.
    pub fn voltage(&self) -> i32 {
        (self.raw_voltage() as i32 - self.settings.adc_voltage_offset)
            .saturating_mul(self.settings.adc_voltage_gain)
    }

    /// Power in µW. Both inputs are truncated to milli-units first.
    pub fn power(&self) -> i32 {
        (self.current_usage() / 1000).saturating_mul(self.voltage() / 1000)
    }

    /// Resistance in µΩ, `None` while the current is too small to divide by.
    pub fn resistance(&self) -> Option<i32> {
        let current = self.current_usage();
        if current <= 0 {
            return None;
        }
        self.voltage()
            .saturating_mul(10)
            .checked_div(current / 100_000)
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.analog.set_output_mode(mode);
    }

    pub fn output_mode(&self) -> OutputMode {
        self.analog.output_mode()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Adopt new settings and reprogram the trim and DAC with them.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.analog
            .set_opamp_offset_trim(trim_register(settings.opamp_offset_trim));
        self.set_current(self.live.current_setpoint);
    }

    pub fn analog(&self) -> &A {
        &self.analog
    }

    pub fn analog_mut(&mut self) -> &mut A {
        &mut self.analog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimAnalog;

    fn control() -> Control<SimAnalog> {
        Control::new(SimAnalog::default(), Settings::default())
    }

    #[test]
    fn range_follows_setpoint() {
        let mut c = control();
        for setpoint in [0, 1, 249_999, 250_000, 250_001, 3_000_000, 6_000_000] {
            c.set_current(setpoint);
            assert_eq!(
                c.current_range() == CurrentRange::Low,
                setpoint <= CURRENT_LOWRANGE_MAX
            );
            assert_eq!(c.analog().range, c.current_range());
        }
    }

    #[test]
    fn setpoint_is_clamped() {
        let mut c = control();
        c.set_current(-5);
        assert_eq!(c.current_setpoint(), 0);
        c.set_current(7_000_000);
        assert_eq!(c.current_setpoint(), CURRENT_FULLRANGE_MAX);
        assert_eq!(c.current_range(), CurrentRange::Full);
        c.adjust_current(i32::MAX);
        assert_eq!(c.current_setpoint(), CURRENT_FULLRANGE_MAX);
        c.adjust_current(i32::MIN);
        assert_eq!(c.current_setpoint(), 0);
    }

    #[test]
    fn dac_uses_range_gain_and_offset() {
        let settings = Settings {
            dac_low_gain: 100,
            dac_low_offset: 3,
            dac_high_gain: 1000,
            dac_high_offset: -2,
            ..Settings::default()
        };
        assert_eq!(dac_counts(10_000, CurrentRange::Low, &settings), 103);
        assert_eq!(dac_counts(1_000_000, CurrentRange::Full, &settings), 998);
        assert_eq!(dac_counts(0, CurrentRange::Full, &settings), 0);

        let broken = Settings {
            dac_low_gain: 0,
            ..settings
        };
        assert_eq!(dac_counts(10_000, CurrentRange::Low, &broken), 0);
    }

    #[test]
    fn readings_apply_offset_and_gain() {
        let mut c = control();
        c.apply_settings(Settings {
            adc_current_offset: -3,
            adc_current_gain: 500,
            adc_voltage_offset: 7,
            adc_voltage_gain: 2000,
            ..Settings::default()
        });
        c.analog_mut().set_raw(AdcChannel::CurrentSense, 1997);
        c.analog_mut().set_raw(AdcChannel::VoltageSense, 6007);

        assert_eq!(c.current_usage(), 2000 * 500); // 1 A
        assert_eq!(c.voltage(), 6000 * 2000); // 12 V
        assert_eq!(c.power(), 1000 * 12_000); // 12 W
        assert_eq!(c.resistance(), Some(120_000_000 / 10)); // 12 Ω
    }

    #[test]
    fn resistance_needs_current() {
        let mut c = control();
        c.analog_mut().set_raw(AdcChannel::VoltageSense, 100);
        c.analog_mut()
            .set_raw(AdcChannel::CurrentSense, DEFAULT_CURRENT_OFFSET_RAW);
        assert_eq!(c.resistance(), None);

        // Below 100 mA the divisor truncates to zero.
        c.analog_mut()
            .set_raw(AdcChannel::CurrentSense, DEFAULT_CURRENT_OFFSET_RAW + 10);
        assert_eq!(c.resistance(), None);
    }

    const DEFAULT_CURRENT_OFFSET_RAW: i16 = crate::config::DEFAULT_ADC_CURRENT_OFFSET as i16;

    #[test]
    fn apply_settings_programs_trim() {
        let mut c = control();
        c.apply_settings(Settings {
            opamp_offset_trim: 9,
            ..Settings::default()
        });
        assert_eq!(c.analog().trim, 9);
    }
}
