//! Heater controller implementations

pub mod bang_bang;
pub mod gpio;

pub use bang_bang::BangBangController;
pub use gpio::GpioHeater;
