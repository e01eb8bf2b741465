//! Thermochron Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. Application logic depends only on these traits,
//! so it can be exercised on the host against the software implementations
//! in [`sim`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  thermochron-core / thermochron-firmware │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  thermochron-hal (this crate - traits)   │
//! └──────────────────────────────────────────┘
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ thermochron-  │       │   sim (host   │
//! │  hal-rp2040   │       │    tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`alarm::AlarmService`], [`alarm::AlarmHandler`] - One-shot and
//!   self-rescheduling hardware alarms
//! - [`gpio::OutputPin`] - Digital output

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;
pub mod gpio;
pub mod sim;

// Re-export key traits at crate root for convenience
pub use alarm::{AlarmError, AlarmHandle, AlarmHandler, AlarmService, Reschedule};
pub use gpio::OutputPin;
pub use sim::SimAlarm;
