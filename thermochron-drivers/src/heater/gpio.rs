//! GPIO heater output
//!
//! Heater control using a GPIO pin driving an SSR or MOSFET.

use thermochron_core::traits::HeaterOutput;
use thermochron_hal::OutputPin;

/// GPIO heater output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioHeater<P> {
    pin: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> GpioHeater<P> {
    /// Create a new GPIO heater output, initially off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, heater is ON when pin is LOW (for active-low SSRs)
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut heater = Self {
            pin,
            inverted,
            on: false,
        };
        heater.set_on(false);
        heater
    }

    /// Create a new GPIO heater with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new GPIO heater with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Get access to the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: OutputPin> HeaterOutput for GpioHeater<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        self.pin.set_state(on != self.inverted);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
