//! Countdown state machine
//!
//! Two states, driven by lifecycle calls and alarm ticks. The machine is
//! explicit and deterministic; the countdown applies every transition
//! through [`TimerState::transition`].

pub mod events;
pub mod machine;

pub use events::TimerEvent;
pub use machine::TimerState;
