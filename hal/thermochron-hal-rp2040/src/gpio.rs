//! GPIO output wrapper

use embassy_rp::gpio::Output;
use thermochron_hal::OutputPin;

/// Push-pull output driving the heater SSR or MOSFET
pub struct HeaterPin<'d>(Output<'d>);

impl<'d> HeaterPin<'d> {
    pub fn new(output: Output<'d>) -> Self {
        Self(output)
    }
}

impl OutputPin for HeaterPin<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
