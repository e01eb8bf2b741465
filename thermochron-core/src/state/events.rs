//! Events that drive the countdown state machine

/// Countdown events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerEvent {
    /// `start` was called (fresh start or restart)
    Start,
    /// An alarm tick was accounted
    ///
    /// `done` is set when the accumulated time reached the target.
    Tick { done: bool },
    /// `stop` was called
    Stop,
}
