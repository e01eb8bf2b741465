//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware fills them from
//! `thermochron.toml`, validated and baked in at build time.

pub mod types;

pub use types::*;
