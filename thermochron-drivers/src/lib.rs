//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in thermochron-core:
//!
//! - Heater controller (bang-bang with hysteresis and hard cut-off)
//! - GPIO heater output (active-high or active-low)
//! - RP2040 on-die temperature sensor conversion

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod heater;
pub mod sensor;
