//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific heater implementations.

pub mod heater;

pub use heater::{HeaterController, HeaterOutput, SensorError, TemperatureSensor};
