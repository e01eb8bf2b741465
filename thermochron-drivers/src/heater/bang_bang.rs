//! Bang-bang heater controller
//!
//! Simple on/off control with hysteresis for temperature regulation.

use thermochron_core::config::HeaterConfig;
use thermochron_core::traits::{HeaterController, HeaterOutput, SensorError, TemperatureSensor};

/// Bang-bang heater controller
///
/// Turns heater on when temperature drops below (target - hysteresis),
/// and off when temperature rises above (target + hysteresis). The
/// heater is forced off at or above the configured cut-off, and whenever
/// the sensor fails.
pub struct BangBangController<S, H> {
    sensor: S,
    heater: H,
    /// Hard cut-off (°C × 10)
    max_temp_x10: i16,
    /// Hysteresis (°C × 10)
    hysteresis_x10: i16,
    target_x10: i16,
    enabled: bool,
    last_temp_x10: Option<i16>,
}

impl<S: TemperatureSensor, H: HeaterOutput> BangBangController<S, H> {
    /// Create a new, disabled bang-bang controller
    pub fn new(sensor: S, mut heater: H, config: &HeaterConfig) -> Self {
        heater.set_on(false);
        Self {
            sensor,
            heater,
            max_temp_x10: config.max_temp_c.saturating_mul(10),
            hysteresis_x10: config.hysteresis_c.saturating_mul(10),
            target_x10: 0,
            enabled: false,
            last_temp_x10: None,
        }
    }

    /// Get access to the underlying sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Get mutable access to the underlying sensor
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Get access to the underlying heater
    pub fn heater(&self) -> &H {
        &self.heater
    }

    fn drive(&mut self, on: bool) {
        if self.heater.is_on() != on {
            self.heater.set_on(on);
        }
    }
}

impl<S: TemperatureSensor, H: HeaterOutput> HeaterController for BangBangController<S, H> {
    fn set_target(&mut self, target_c: i16) {
        self.target_x10 = target_c.saturating_mul(10).min(self.max_temp_x10);
    }

    fn target(&self) -> i16 {
        self.target_x10 / 10
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drive(false);
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn last_reading_x10(&self) -> Option<i16> {
        self.last_temp_x10
    }

    fn update(&mut self) -> Result<(), SensorError> {
        let temp_x10 = match self.sensor.read_celsius_x10() {
            Ok(t) => t,
            Err(e) => {
                // No feedback, no heat
                self.last_temp_x10 = None;
                self.drive(false);
                return Err(e);
            }
        };
        self.last_temp_x10 = Some(temp_x10);

        if !self.enabled {
            return Ok(());
        }

        if temp_x10 >= self.max_temp_x10 {
            self.drive(false);
            return Ok(());
        }

        let low_threshold = self.target_x10 - self.hysteresis_x10;
        let high_threshold = self.target_x10 + self.hysteresis_x10;

        if temp_x10 < low_threshold {
            self.drive(true);
        } else if temp_x10 > high_threshold {
            self.drive(false);
        }
        // Otherwise, hold the current state (hysteresis band)

        Ok(())
    }
}
