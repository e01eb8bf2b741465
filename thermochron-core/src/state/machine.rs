//! State machine definition

use super::events::TimerEvent;

/// Countdown states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// No countdown in progress, no alarm outstanding
    #[default]
    Stopped,
    /// Counting down, exactly one alarm outstanding
    Running,
}

impl TimerState {
    /// Check if a countdown is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: TimerEvent) -> Self {
        use TimerEvent::*;
        use TimerState::*;

        match (self, event) {
            // Start always (re)arms, discarding any countdown in flight
            (_, Start) => Running,

            (Running, Tick { done: false }) => Running,
            (Running, Tick { done: true }) => Stopped,

            (_, Stop) => Stopped,

            // Late ticks after a stop change nothing
            (Stopped, Tick { .. }) => Stopped,
        }
    }
}
