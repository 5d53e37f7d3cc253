#![cfg_attr(not(test), no_std)]

use common::{AdcBase, ClockBase};
use math::common::compute_ntc_thermistor_temperature;
use math::measurements::{Resistance, Temperature, Voltage};

use crate::sampling::SampleBuffer;

pub mod sampling;

/// Circuit and smoothing parameters of an NTC thermistor in a voltage
/// divider, stored verbatim for the lifetime of the driver.
#[derive(Clone, Copy)]
pub struct ThermistorConfig {
    /// Supply voltage driving the divider.
    pub vcc: Voltage,
    /// ADC reference voltage. May differ from `vcc` on boards with a
    /// separate reference.
    pub analog_reference: Voltage,
    /// Fixed resistor of the divider (usually 10k).
    pub r_series: Resistance,
    /// Maximum raw code returned by the converter (4095 for 12 bit).
    pub adc_max: u16,
    /// Thermistor resistance at the nominal temperature (usually 10k).
    pub r0: Resistance,
    /// Nominal temperature for `r0` (assume 25 C if the datasheet is silent).
    pub t0: Temperature,
    /// Beta coefficient of the thermistor material, kelvin scale
    /// (typically 3380, 3435 or 3950).
    pub b: Temperature,
    /// Number of raw readings averaged per computed temperature; clamped
    /// to `sampling::MAX_SAMPLES`.
    pub samples: usize,
    /// Minimum spacing between consecutive raw reads.
    pub sample_delay_ms: u32,
}

impl ThermistorConfig {
    /// Common hardware defaults: `vcc = analog_reference = 3.3 V`,
    /// `adc_max = 4095`.
    pub fn new(
        r_series: Resistance,
        r0: Resistance,
        t0: Temperature,
        b: Temperature,
        samples: usize,
        sample_delay_ms: u32,
    ) -> Self {
        Self::with_adc_max(r_series, 4095, r0, t0, b, samples, sample_delay_ms)
    }

    /// As [`ThermistorConfig::new`] with an explicit converter ceiling,
    /// keeping `vcc = analog_reference = 3.3 V`.
    pub fn with_adc_max(
        r_series: Resistance,
        adc_max: u16,
        r0: Resistance,
        t0: Temperature,
        b: Temperature,
        samples: usize,
        sample_delay_ms: u32,
    ) -> Self {
        Self {
            vcc: Voltage::from_volts(3.3),
            analog_reference: Voltage::from_volts(3.3),
            r_series,
            adc_max,
            r0,
            t0,
            b,
            samples,
            sample_delay_ms,
        }
    }
}

/// Cooperative driver for a single thermistor channel.
///
/// Call [`Thermistor::poll`] on every iteration of the control loop; the
/// driver decides internally whether a new reading is due. Nothing here
/// blocks, and no reading is taken outside of `poll`.
pub struct Thermistor<A: AdcBase> {
    read_pin: A::Pin,
    config: ThermistorConfig,
    samples: SampleBuffer,
}

impl<A: AdcBase> Thermistor<A> {
    pub fn new(adc: &mut A, mut read_pin: A::Pin, config: ThermistorConfig) -> Self {
        adc.configure_input(&mut read_pin);
        let samples = SampleBuffer::new(config.samples);
        Self {
            read_pin,
            config,
            samples,
        }
    }

    /// Replace the configuration and start a fresh sampling window. The
    /// only way validity returns to false.
    pub fn reconfigure(&mut self, adc: &mut A, config: ThermistorConfig) {
        adc.configure_input(&mut self.read_pin);
        self.samples.reset(config.samples);
        self.config = config;
    }

    /// Take a reading if the sample delay has elapsed, otherwise do nothing.
    ///
    /// The gate compares wrapping millisecond timestamps, so a single
    /// counter wraparound cannot stall sampling.
    pub fn poll<C: ClockBase>(&mut self, adc: &mut A, clock: &C) {
        let now = clock.now_millis();
        if now.wrapping_sub(self.samples.last_read_millis()) > self.config.sample_delay_ms {
            let raw = adc.read(&mut self.read_pin);
            #[cfg(feature = "defmt-log")]
            defmt::trace!("accepted raw sample: {}", raw);
            self.samples.record(raw, now);
        }
    }

    /// Whether the sampling window has completed at least one full wrap
    /// since the last (re)configuration. Temperatures read before this
    /// returns true average over empty slots.
    pub fn is_valid(&self) -> bool {
        self.samples.is_valid()
    }

    /// The clamped averaging window.
    pub fn num_samples(&self) -> usize {
        self.samples.num_samples()
    }

    pub fn read_temperature(&self) -> Temperature {
        compute_ntc_thermistor_temperature(
            self.samples.average(),
            self.config.vcc,
            self.config.r_series,
            self.config.r0,
            self.config.t0,
            self.config.b,
        )
    }

    pub fn read_temp_kelvin(&self) -> f64 {
        self.read_temperature().as_kelvin()
    }

    pub fn read_temp_celsius(&self) -> f64 {
        self.read_temp_kelvin() - 273.15
    }

    pub fn read_temp_fahrenheit(&self) -> f64 {
        self.read_temp_celsius() * 1.8 + 32.0
    }
}
