//! Hardware alarm abstractions
//!
//! An alarm service arms a callback to run once after a delay. The callback
//! returns a [`Reschedule`] telling the service whether to fire again, which
//! gives periodic ticks without a second scheduling call.
//!
//! Handlers run in the service's execution context. On hardware that is an
//! interrupt handler, so implementations of [`AlarmHandler`] must not block.

/// Opaque reference to a scheduled alarm
///
/// Handles are never reused while the alarm they name is pending, so a
/// handler can compare the handle it is called with against the one it
/// stored to detect stale firings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmHandle(u32);

impl AlarmHandle {
    /// Create a handle from a raw id
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Raw id of this handle
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What the service should do after a handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reschedule {
    /// Do not fire again; the handle becomes invalid
    Stop,
    /// Fire again after the given number of microseconds, keeping the handle
    After(u64),
}

/// Errors from alarm scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// All alarm slots are in use
    NoFreeAlarm,
    /// The deadline had already passed and `fire_if_past` was not set
    Missed,
}

/// Receiver of alarm firings
pub trait AlarmHandler: Sync {
    /// Called when the alarm named by `handle` fires
    fn on_alarm(&self, handle: AlarmHandle) -> Reschedule;
}

/// Alarm scheduling facility
pub trait AlarmService {
    /// Arm `handler` to run once after `delay_us` microseconds
    ///
    /// With `fire_if_past` set, an alarm whose deadline has already passed
    /// by the time it is armed fires as soon as possible instead of being
    /// dropped.
    fn schedule(
        &self,
        delay_us: u64,
        fire_if_past: bool,
        handler: &'static dyn AlarmHandler,
    ) -> Result<AlarmHandle, AlarmError>;

    /// Cancel a pending alarm
    ///
    /// Returns `true` if an alarm was pending and is now cancelled. Handles
    /// that already fired or were already cancelled return `false`.
    /// Cancelling an alarm from inside its own handler (or while the handler
    /// runs in another context) returns `true` and suppresses the reschedule
    /// the handler asks for.
    fn cancel(&self, handle: AlarmHandle) -> bool;
}
