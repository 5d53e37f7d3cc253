#![cfg_attr(not(test), no_std)]

/// One-shot analog-to-digital conversion on a single channel.
///
/// Implementors wrap the platform ADC peripheral; the driver never touches
/// the hardware directly, so host tests can supply a fake.
pub trait AdcBase {
    type Pin;

    /// Prepare the channel for conversions (direction, mux, sample time).
    fn configure_input(&mut self, pin: &mut Self::Pin);

    /// Sample the channel once, returning the raw code in `[0, adc_max]`.
    fn read(&mut self, pin: &mut Self::Pin) -> u16;
}

/// Monotonic millisecond counter.
///
/// Wraps at the u32 width; consumers must compare timestamps with
/// `wrapping_sub` so a single wraparound stays correct.
pub trait ClockBase {
    fn now_millis(&self) -> u32;
}
