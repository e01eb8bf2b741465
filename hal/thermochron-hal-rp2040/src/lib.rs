//! RP2040-specific HAL for the heated chamber firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `thermochron-hal` traits:
//!
//! - Hardware alarm service on TIMER alarm 1 (alarm 0 belongs to the
//!   embassy time driver)
//! - Heater output pin

#![no_std]

pub mod alarm;
pub mod gpio;

pub use alarm::{HardwareAlarm, ALARM};
pub use gpio::HeaterPin;

// Re-export shared traits from thermochron-hal for convenience
pub use thermochron_hal::{AlarmService, OutputPin};
