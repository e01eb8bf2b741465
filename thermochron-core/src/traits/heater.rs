//! Heater and temperature sensor traits

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No sample has been taken yet
    NoReading,
    /// Reading out of the sensor's plausible range
    OutOfRange,
}

/// Trait for temperature sensors
pub trait TemperatureSensor {
    /// Read the current temperature in 0.1°C units
    ///
    /// For example, 45.5°C is returned as 455.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError>;

    /// Read the current temperature in whole degrees Celsius
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.read_celsius_x10().map(|t| t / 10)
    }
}

/// Trait for heater output control
///
/// Implementations control the heater element via GPIO, PWM, or SSR.
pub trait HeaterOutput {
    /// Turn the heater on or off
    fn set_on(&mut self, on: bool);

    /// Check if the heater is currently on
    fn is_on(&self) -> bool;
}

/// Closed-loop heater control with temperature feedback
pub trait HeaterController {
    /// Set the target temperature in degrees Celsius
    fn set_target(&mut self, target_c: i16);

    /// Get the current target temperature
    fn target(&self) -> i16;

    /// Enable or disable the controller
    ///
    /// When disabled, the heater output is forced off.
    fn enable(&mut self, enabled: bool);

    /// Check if the controller is enabled
    fn is_enabled(&self) -> bool;

    /// Last temperature seen by [`update`](Self::update), in 0.1°C units
    fn last_reading_x10(&self) -> Option<i16>;

    /// Read the sensor and drive the output
    ///
    /// Called periodically by the heater task.
    fn update(&mut self) -> Result<(), SensorError>;
}
