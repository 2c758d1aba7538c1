//! Calibration wizard.
//!
//! Works on a scratch copy of the settings and commits it with a single
//! store write after the last step. Leaving early (overtemp) discards the
//! scratch copy and restores the front end to the live settings.
//!
//! 1. Offsets: terminals open, snapshot the raw ADC offsets.
//! 2. Voltage gain: known voltage applied, trim the gain with the encoder.
//! 3. Opamp offset: sweep the trim register at a fixed probe current.
//! 4. Current gain: acknowledgement only.

use super::{Preempted, Transition, Ui};
use crate::config::{
    CAL_GAIN_STEP_DIVISOR, CAL_PROBE_CURRENT_UA, CAL_SETTLE_MS, DISPLAY_COLUMNS, DISPLAY_ROWS,
    GLYPH_WIDTH, OPAMP_TRIM_STEPS, PRIMARY_BUTTON,
};
use crate::control::{trim_register, AdcChannel, Analog};
use crate::event::EventKind;
use crate::format::format_number;
use crate::lcd::{glyph, Lcd};
use crate::pump::EventSource;
use crate::settings::Settings;
use crate::storage::SettingsStore;

/// Scale a calibration gain by `detents` steps of `1/CAL_GAIN_STEP_DIVISOR`.
pub fn adjust_gain(gain: i32, detents: i32) -> i32 {
    gain.saturating_add(gain.saturating_mul(detents) / CAL_GAIN_STEP_DIVISOR)
}

impl<A, L, E, S> Ui<A, L, E, S>
where
    A: Analog,
    L: Lcd,
    E: EventSource,
    S: SettingsStore,
{
    pub(super) async fn calibrate(&mut self) -> Transition {
        self.control.set_current(0);
        let live = *self.control.settings();
        let mut scratch = live;

        self.lcd.clear_all();
        self.lcd.draw_text(0, 0, " CALIBRATION ", true);

        if let Err(preempted) = self.calibration_steps(&mut scratch).await {
            warn!("Calibration aborted");
            self.control.apply_settings(live);
            return preempted.into();
        }

        if self.commit_settings(scratch).await {
            info!("Calibration stored");
        } else {
            self.control.apply_settings(live);
        }
        Transition::Home
    }

    async fn calibration_steps(&mut self, scratch: &mut Settings) -> Result<(), Preempted> {
        self.calibrate_offsets(scratch).await?;
        self.calibrate_voltage(scratch).await?;
        self.calibrate_opamp_offset(scratch).await;
        self.calibrate_current(scratch).await
    }

    fn draw_next_hint(&mut self) {
        self.lcd.draw_text(6, 38, glyph::ENTER, false);
        self.lcd.draw_text(6, 38 + GLYPH_WIDTH, ": Next", false);
    }

    async fn calibrate_offsets(&mut self, scratch: &mut Settings) -> Result<(), Preempted> {
        self.lcd.draw_text(2, 0, "  1: Offset  ", true);
        self.draw_next_hint();
        self.wait_for_button().await?;

        scratch.adc_voltage_offset = self.control.raw_voltage() as i32;
        scratch.adc_current_offset = self.control.raw_current_usage() as i32;
        info!(
            "Cal offsets: voltage {} current {}",
            scratch.adc_voltage_offset, scratch.adc_current_offset
        );
        Ok(())
    }

    async fn calibrate_voltage(&mut self, scratch: &mut Settings) -> Result<(), Preempted> {
        self.lcd.draw_text(2, 0, "  2: Voltage ", true);

        loop {
            let event = self.next_event().await;

            let volts = (self.control.raw_voltage() as i32 - scratch.adc_voltage_offset)
                .saturating_mul(scratch.adc_voltage_gain);
            let mut text = format_number(volts, 'V');
            let _ = text.push(' ');
            self.lcd.draw_text(4, 43, &text, false);

            match event.kind {
                EventKind::UpDown(detents) => {
                    scratch.adc_voltage_gain = adjust_gain(scratch.adc_voltage_gain, detents);
                }
                EventKind::ButtonPress(PRIMARY_BUTTON) => break,
                EventKind::Overtemp => return Err(Preempted),
                _ => {}
            }
        }

        info!("Cal voltage gain {}", scratch.adc_voltage_gain);
        Ok(())
    }

    /// Sweep the opamp trim upwards at the probe current and keep the
    /// setting just below the first one where the sensed current no longer
    /// exceeds the programmed one. Input is not serviced during the sweep.
    async fn calibrate_opamp_offset(&mut self, scratch: &mut Settings) {
        self.lcd.clear(2, 0, DISPLAY_ROWS, DISPLAY_COLUMNS, 0);
        self.lcd.draw_text(4, 12, "Please wait", false);
        self.lcd.flush();
        self.control.set_current(CAL_PROBE_CURRENT_UA);

        let mut crossing = None;
        for trim in 0..OPAMP_TRIM_STEPS {
            self.control.analog_mut().set_opamp_offset_trim(trim);
            self.events.delay_ms(CAL_SETTLE_MS).await;

            let analog = self.control.analog();
            let residual = analog.adc_read(AdcChannel::CurrentSense) as i32
                - analog.adc_read(AdcChannel::CurrentSet) as i32;
            if residual <= 0 {
                crossing = Some(trim);
                break;
            }
        }

        match crossing {
            Some(trim) => {
                scratch.opamp_offset_trim = trim.saturating_sub(1) as i32;
                info!("Cal opamp trim {}", scratch.opamp_offset_trim);
            }
            None => warn!(
                "Opamp trim sweep found no crossing - keeping {}",
                scratch.opamp_offset_trim
            ),
        }

        self.control
            .analog_mut()
            .set_opamp_offset_trim(trim_register(scratch.opamp_offset_trim));
        self.control.set_current(0);
    }

    // TODO: drive a known current and trim adc_current_gain and the DAC
    // gains from it once the reference fixture exists.
    async fn calibrate_current(&mut self, _scratch: &mut Settings) -> Result<(), Preempted> {
        self.lcd.clear(4, 0, DISPLAY_ROWS, DISPLAY_COLUMNS, 0);
        self.lcd.draw_text(2, 0, "  3: Current ", true);
        self.draw_next_hint();
        self.wait_for_button().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_steps_truncate() {
        assert_eq!(adjust_gain(2008, 5), 2028);
        assert_eq!(adjust_gain(2028, -1), 2024);
        assert_eq!(adjust_gain(400, 1), 400);
        assert_eq!(adjust_gain(i32::MAX, 1000), i32::MAX);
    }
}
