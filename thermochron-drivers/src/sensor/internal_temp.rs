//! RP2040 on-die temperature sensor
//!
//! The sensor is an ADC channel whose voltage falls as the die warms:
//!
//! ```text
//! T = 27 - (V - 0.706) / 0.001721
//! ```
//!
//! The ADC itself is async and lives in the firmware, so this type only
//! converts samples. The heater task reads the ADC, [`record`]s the raw
//! sample and then lets the controller read the converted value.
//!
//! [`record`]: InternalTempSensor::record

use thermochron_core::traits::{SensorError, TemperatureSensor};

/// ADC reference voltage (µV)
const VREF_UV: i64 = 3_300_000;

/// 12-bit ADC full scale
const ADC_COUNTS: i64 = 4096;

/// Sensor voltage at 27°C (µV)
const V27_UV: i64 = 706_000;

/// Slope in µV per °C
const SLOPE_UV_PER_C: i64 = 1_721;

/// Plausible die temperature range (°C × 10)
const MIN_TEMP_X10: i16 = -400;
const MAX_TEMP_X10: i16 = 1250;

/// On-die temperature sensor fed with raw 12-bit ADC samples
#[derive(Debug, Clone, Default)]
pub struct InternalTempSensor {
    last_raw: Option<u16>,
}

impl InternalTempSensor {
    /// Create a sensor with no sample yet
    pub const fn new() -> Self {
        Self { last_raw: None }
    }

    /// Store the latest raw ADC sample
    pub fn record(&mut self, raw: u16) {
        self.last_raw = Some(raw);
    }

    /// Forget the stored sample (e.g. after an ADC error)
    pub fn invalidate(&mut self) {
        self.last_raw = None;
    }

    /// Convert a raw 12-bit ADC sample to 0.1°C units
    pub fn raw_to_celsius_x10(raw: u16) -> Result<i16, SensorError> {
        let uv = i64::from(raw) * VREF_UV / ADC_COUNTS;
        let temp_x10 = 270 - (uv - V27_UV) * 10 / SLOPE_UV_PER_C;

        if temp_x10 < i64::from(MIN_TEMP_X10) || temp_x10 > i64::from(MAX_TEMP_X10) {
            return Err(SensorError::OutOfRange);
        }
        Ok(temp_x10 as i16)
    }
}

impl TemperatureSensor for InternalTempSensor {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        let raw = self.last_raw.ok_or(SensorError::NoReading)?;
        Self::raw_to_celsius_x10(raw)
    }
}
