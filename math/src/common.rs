#[allow(unused_imports)]
use micromath::F32Ext; // f32::ln in no_std builds

use measurements::{Resistance, Temperature, Voltage};

// Conversion anchors of the calibration curve. The averaged sample is always
// scaled against these values; the configured reference voltage and ADC
// ceiling do not enter the formula.
const CAL_VREF_VOLTS: f64 = 3.3;
const CAL_ADC_STEPS: f64 = 4095.0;

/*
ADC value = R_series / (R_series + R_ntc) * Vcc * steps / Vref
Vcc: supply voltage of the divider
Vref: reference voltage of the converter
*/

/// Invert the voltage divider: recover the thermistor's resistance from the
/// averaged raw sample and the fixed series resistor.
///
/// A zero sample divides by zero and the infinity propagates into the
/// result; callers get IEEE-754 semantics, never a panic.
pub fn compute_thermistor_resistance(
    sample: f64,
    vcc: Voltage,
    r_series: Resistance,
) -> Resistance {
    let v_adc = CAL_VREF_VOLTS * (sample / CAL_ADC_STEPS);
    let r_ntc = (vcc.as_volts() * r_series.as_ohms()) / v_adc - r_series.as_ohms();
    Resistance::from_ohms(r_ntc)
}

// https://circuitdigest.com/microcontroller-projects/interfacing-Thermistor-with-arduino
// Steinhart-Hart equation simplified for ntc thermistors:
// 1/T = 1/T0 + (1/B) * ln(R/R0)
pub fn compute_ntc_thermistor_temperature(
    sample: f64,
    vcc: Voltage,
    r_series: Resistance,
    r0: Resistance,
    t0: Temperature,
    b: Temperature,
) -> Temperature {
    let r_ntc = compute_thermistor_resistance(sample, vcc, r_series);
    let val_inv = (1.0 / t0.as_kelvin())
        + (1.0 / b.as_kelvin()) * (((r_ntc.as_ohms() / r0.as_ohms()) as f32).ln() as f64);
    Temperature::from_kelvin(1.0 / val_inv)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use measurements::{Resistance, Temperature, Voltage};

    use super::{compute_ntc_thermistor_temperature, compute_thermistor_resistance};

    #[test]
    fn test_resistance_at_half_scale() {
        let r = compute_thermistor_resistance(
            2047.5,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
        );
        assert_float_absolute_eq!(r.as_ohms(), 10_000.0, 0.000001);
    }

    #[test]
    fn test_resistance_at_two_thirds_scale() {
        // 2730/4095 = 2/3 of full scale, v_adc = 2.2 V
        let r = compute_thermistor_resistance(
            2730.0,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
        );
        assert_float_absolute_eq!(r.as_ohms(), 5_000.0, 0.000001);
    }

    #[test]
    fn test_resistance_zero_sample_diverges() {
        let r = compute_thermistor_resistance(
            0.0,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
        );
        assert!(r.as_ohms().is_infinite());
    }

    #[test]
    fn test_temperature_at_nominal_point() {
        // r_ntc == r0, so the log term vanishes and t == t0
        let t = compute_ntc_thermistor_temperature(
            2047.5,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
            Resistance::from_ohms(10_000.0),
            Temperature::from_celsius(25.0),
            Temperature::from_kelvin(3950.0),
        );
        assert_float_absolute_eq!(t.as_kelvin(), 298.15, 0.000001);
        assert_float_absolute_eq!(t.as_celsius(), 25.0, 0.000001);
        assert_float_absolute_eq!(t.as_fahrenheit(), 77.0, 0.00001);
    }

    #[test]
    fn test_temperature_above_nominal_point() {
        // r_ntc = 5 kOhm, half of nominal, so the reading is warmer than t0
        let t = compute_ntc_thermistor_temperature(
            2730.0,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
            Resistance::from_ohms(10_000.0),
            Temperature::from_celsius(25.0),
            Temperature::from_kelvin(3950.0),
        );
        assert_float_absolute_eq!(t.as_celsius(), 41.4602, 0.001);
    }

    #[test]
    fn test_temperature_zero_sample_no_panic() {
        let t = compute_ntc_thermistor_temperature(
            0.0,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
            Resistance::from_ohms(10_000.0),
            Temperature::from_celsius(25.0),
            Temperature::from_kelvin(3950.0),
        );
        // infinite resistance collapses the reciprocal chain to 0 K
        assert_eq!(t.as_kelvin(), 0.0);
    }

    #[test]
    fn test_temperature_negative_resistance_is_nan() {
        // a 16-bit converter can push the average past the 4095 anchor,
        // leaving a negative inferred resistance
        let t = compute_ntc_thermistor_temperature(
            8190.0,
            Voltage::from_volts(3.3),
            Resistance::from_ohms(10_000.0),
            Resistance::from_ohms(10_000.0),
            Temperature::from_celsius(25.0),
            Temperature::from_kelvin(3950.0),
        );
        assert!(t.as_kelvin().is_nan());
    }
}
