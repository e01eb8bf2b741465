//! Board-agnostic core logic for the heated chamber firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Countdown timer driven by a hardware alarm
//! - Timer state machine
//! - Job control (duration, target temperature, start/stop)
//! - Heater and sensor traits
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod job;
pub mod state;
pub mod timer;
pub mod traits;
