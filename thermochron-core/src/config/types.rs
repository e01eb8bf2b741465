//! Configuration type definitions

use thermochron_protocol::{TEMP_MAX_C, TEMP_MIN_C, TIME_MAX_H};

/// Heater controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterConfig {
    /// Hard cut-off temperature (°C); the heater never runs above this
    pub max_temp_c: i16,
    /// Hysteresis either side of the target (°C)
    pub hysteresis_c: i16,
    /// Heater output is active-low (e.g. some SSR boards)
    pub active_low: bool,
    /// Sensor poll and control loop period
    pub poll_interval_ms: u32,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            max_temp_c: 70,
            hysteresis_c: 1,
            active_low: false,
            poll_interval_ms: 500,
        }
    }
}

/// Job settings applied after boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JobDefaults {
    /// Target chamber temperature (°C)
    pub temp_c: i16,
    /// Job duration (hours)
    pub duration_h: u8,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            temp_c: TEMP_MIN_C,
            duration_h: 1,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Default temperature outside the accepted command range
    TemperatureOutOfRange,
    /// Default duration outside the accepted command range
    DurationOutOfRange,
    /// Cut-off below the highest temperature a job may request
    CutoffTooLow,
    /// Hysteresis must be positive
    InvalidHysteresis,
    /// Poll interval must be non-zero
    InvalidPollInterval,
}

impl HeaterConfig {
    /// Check that the heater can reach every temperature a job may request
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_temp_c < TEMP_MAX_C {
            return Err(ConfigError::CutoffTooLow);
        }
        if self.hysteresis_c <= 0 {
            return Err(ConfigError::InvalidHysteresis);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }
}

impl JobDefaults {
    /// Check the defaults against the command ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&self.temp_c) {
            return Err(ConfigError::TemperatureOutOfRange);
        }
        if self.duration_h > TIME_MAX_H {
            return Err(ConfigError::DurationOutOfRange);
        }
        Ok(())
    }
}
