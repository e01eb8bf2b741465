//! Tick-driven countdown timer
//!
//! The countdown works in fixed one-minute quanta. Elapsed time is the
//! number of ticks accounted times [`TICK_INTERVAL_MS`], not wall-clock
//! time, so a delayed alarm delays completion by the same amount.

pub mod countdown;
pub mod time_left;

pub use countdown::{CompletionCallback, Countdown, MS_PER_HOUR, TICK_INTERVAL_MS, TICK_INTERVAL_US};
pub use time_left::{TimeLeft, TIME_LEFT_LEN};
