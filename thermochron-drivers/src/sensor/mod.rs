//! Temperature sensor implementations

pub mod internal_temp;

pub use internal_temp::InternalTempSensor;
