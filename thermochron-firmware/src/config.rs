//! Board configuration
//!
//! Generated by build.rs from `thermochron.toml`, which is validated at
//! compile time. A bad value fails the build instead of the boot.

use thermochron_core::config::{HeaterConfig, JobDefaults};

include!(concat!(env!("OUT_DIR"), "/config.rs"));
