//! Countdown timer
//!
//! One logical countdown per instance. [`Countdown::start`] schedules the
//! first tick with the alarm service; each tick then asks the service to
//! fire again until the target is reached, invokes the completion callback
//! once and stops rescheduling.
//!
//! The public API runs in thread mode while ticks arrive from the alarm
//! context (an interrupt on hardware). All fields live in a single record
//! behind a critical-section mutex, so neither side ever observes a
//! half-updated target/elapsed/callback combination. The completion
//! callback runs after the lock is released and may call `start` again.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;
use thermochron_hal::{AlarmError, AlarmHandle, AlarmHandler, AlarmService, Reschedule};

use super::time_left::{TimeLeft, TIME_LEFT_LEN};
use crate::state::{TimerEvent, TimerState};

/// Tick interval in milliseconds (one minute)
pub const TICK_INTERVAL_MS: u64 = 60_000;

/// Tick interval in microseconds, the unit the alarm service works in
pub const TICK_INTERVAL_US: u64 = TICK_INTERVAL_MS * 1_000;

/// Milliseconds per hour of requested duration
pub const MS_PER_HOUR: u64 = 3_600_000;

/// Action invoked when a countdown reaches its target
pub type CompletionCallback = fn();

/// Shared countdown record
#[derive(Debug)]
struct Inner {
    state: TimerState,
    elapsed_ms: u64,
    target_ms: u64,
    /// Outstanding tick; `Some` exactly while running
    alarm: Option<AlarmHandle>,
    on_complete: Option<CompletionCallback>,
}

/// Result of accounting one tick
enum Tick {
    /// Target not reached, fire again
    Continue,
    /// Target reached; carries the callback to run outside the lock
    Complete(Option<CompletionCallback>),
    /// Tick from a cancelled or replaced alarm
    Stale,
}

impl Inner {
    const fn new() -> Self {
        Self {
            state: TimerState::Stopped,
            elapsed_ms: 0,
            target_ms: 0,
            alarm: None,
            on_complete: None,
        }
    }

    /// Cancel the outstanding tick, if any, and enter Stopped
    fn disarm<A: AlarmService>(&mut self, alarm: &A) {
        if let Some(handle) = self.alarm.take() {
            alarm.cancel(handle);
        }
        self.state = self.state.transition(TimerEvent::Stop);
    }

    fn tick(&mut self, handle: AlarmHandle) -> Tick {
        if !self.state.is_running() || self.alarm != Some(handle) {
            return Tick::Stale;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(TICK_INTERVAL_MS);
        let done = self.elapsed_ms >= self.target_ms;
        self.state = self.state.transition(TimerEvent::Tick { done });

        if done {
            self.alarm = None;
            Tick::Complete(self.on_complete.take())
        } else {
            Tick::Continue
        }
    }

    fn remaining(&self) -> TimeLeft {
        if !self.state.is_running() {
            return TimeLeft::ZERO;
        }
        TimeLeft::from_millis(self.target_ms.saturating_sub(self.elapsed_ms))
    }
}

/// Single-shot countdown on top of an [`AlarmService`]
///
/// Meant to live in a `static` for the lifetime of the program:
///
/// ```ignore
/// static ALARM: HardwareAlarm = HardwareAlarm::new();
/// static COUNTDOWN: Countdown<HardwareAlarm> = Countdown::new(&ALARM);
/// ```
pub struct Countdown<A: 'static> {
    alarm: &'static A,
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl<A: AlarmService + Sync + 'static> Countdown<A> {
    /// Create a stopped countdown on top of `alarm`
    pub const fn new(alarm: &'static A) -> Self {
        Self {
            alarm,
            inner: Mutex::new(RefCell::new(Inner::new())),
        }
    }

    /// Start a countdown of `hours` hours
    ///
    /// Any countdown in progress is discarded first; its callback will not
    /// run. `hours` is expected in 0..=24; larger values still count down
    /// correctly but [`time_left`](Self::time_left) saturates at `99:59`.
    ///
    /// Fails only if the alarm service has no free alarm, in which case
    /// the timer is left stopped.
    pub fn start(
        &'static self,
        hours: u8,
        on_complete: Option<CompletionCallback>,
    ) -> Result<(), AlarmError> {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();

            inner.disarm(self.alarm);
            inner.elapsed_ms = 0;
            inner.target_ms = u64::from(hours) * MS_PER_HOUR;
            inner.on_complete = on_complete;

            let handle = self.alarm.schedule(TICK_INTERVAL_US, true, self)?;
            inner.alarm = Some(handle);
            inner.state = inner.state.transition(TimerEvent::Start);

            Ok(())
        })
    }

    /// Stop the countdown without running its callback
    ///
    /// Idempotent. Counters are left as they are until the next `start`.
    pub fn stop(&self) {
        self.inner.lock(|cell| cell.borrow_mut().disarm(self.alarm));
    }

    /// Check if a countdown is in progress
    pub fn is_running(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().state.is_running())
    }

    /// Remaining time, zero when stopped
    pub fn remaining(&self) -> TimeLeft {
        self.inner.lock(|cell| cell.borrow().remaining())
    }

    /// Remaining time formatted as `HH:MM`, `"00:00"` when stopped
    pub fn time_left(&self) -> String<TIME_LEFT_LEN> {
        self.remaining().to_hhmm()
    }
}

impl<A: AlarmService + Sync + 'static> AlarmHandler for Countdown<A> {
    fn on_alarm(&self, handle: AlarmHandle) -> Reschedule {
        let tick = self.inner.lock(|cell| cell.borrow_mut().tick(handle));

        match tick {
            Tick::Continue => Reschedule::After(TICK_INTERVAL_US),
            Tick::Complete(on_complete) => {
                if let Some(callback) = on_complete {
                    callback();
                }
                Reschedule::Stop
            }
            Tick::Stale => Reschedule::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use proptest::prelude::*;
    use thermochron_hal::SimAlarm;

    /// Declare a sim alarm and a countdown on top of it
    macro_rules! countdown {
        ($alarm:ident, $timer:ident) => {
            static $alarm: SimAlarm = SimAlarm::new();
            static $timer: Countdown<SimAlarm> = Countdown::new(&$alarm);
        };
    }

    /// Fire `n` ticks, asserting each one was pending
    fn fire_ticks(alarm: &SimAlarm, n: u32) {
        for _ in 0..n {
            assert!(alarm.fire_next(), "expected a pending tick");
        }
    }

    fn current_handle<A: AlarmService + Sync>(timer: &Countdown<A>) -> Option<AlarmHandle> {
        timer.inner.lock(|cell| cell.borrow().alarm)
    }

    #[test]
    fn test_stopped_reports_zero() {
        countdown!(ALARM, TIMER);

        assert!(!TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "00:00");
        assert_eq!(ALARM.pending(), 0);
    }

    #[test]
    fn test_start_reports_full_duration() {
        countdown!(ALARM, TIMER);

        TIMER.start(1, None).unwrap();
        assert!(TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "01:00");
        assert_eq!(ALARM.pending(), 1);
    }

    #[test]
    fn test_ticks_are_one_minute_apart() {
        countdown!(ALARM, TIMER);

        TIMER.start(1, None).unwrap();
        assert_eq!(ALARM.advance(TICK_INTERVAL_US - 1), 0);
        assert_eq!(ALARM.advance(1), 1);
        assert_eq!(TIMER.time_left().as_str(), "00:59");

        assert_eq!(ALARM.advance(10 * TICK_INTERVAL_US), 10);
        assert_eq!(TIMER.time_left().as_str(), "00:49");
    }

    #[test]
    fn test_completes_after_exact_tick_count() {
        countdown!(ALARM, TIMER);
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }

        TIMER.start(2, Some(on_done)).unwrap();

        fire_ticks(&ALARM, 2 * 60 - 1);
        assert!(TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "00:01");
        assert_eq!(DONE.load(Ordering::SeqCst), 0);

        fire_ticks(&ALARM, 1);
        assert!(!TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "00:00");
        assert_eq!(DONE.load(Ordering::SeqCst), 1);

        // No further ticks are scheduled
        assert_eq!(ALARM.pending(), 0);
        assert!(!ALARM.fire_next());
        assert_eq!(DONE.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_hours_completes_on_first_tick() {
        countdown!(ALARM, TIMER);
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }

        TIMER.start(0, Some(on_done)).unwrap();
        assert!(TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "00:00");

        fire_ticks(&ALARM, 1);
        assert!(!TIMER.is_running());
        assert_eq!(DONE.load(Ordering::SeqCst), 1);
        assert_eq!(ALARM.pending(), 0);
    }

    #[test]
    fn test_missing_callback_completes_silently() {
        countdown!(ALARM, TIMER);

        TIMER.start(1, None).unwrap();
        fire_ticks(&ALARM, 60);
        assert!(!TIMER.is_running());
        assert_eq!(ALARM.pending(), 0);
    }

    #[test]
    fn test_stop_before_first_tick_suppresses_callback() {
        countdown!(ALARM, TIMER);
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }

        TIMER.start(1, Some(on_done)).unwrap();
        TIMER.stop();

        assert!(!TIMER.is_running());
        assert_eq!(ALARM.pending(), 0);
        assert_eq!(ALARM.advance(2 * 60 * TICK_INTERVAL_US), 0);
        assert_eq!(DONE.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        countdown!(ALARM, TIMER);

        TIMER.start(3, None).unwrap();
        fire_ticks(&ALARM, 5);

        TIMER.stop();
        assert_eq!(TIMER.time_left().as_str(), "00:00");
        TIMER.stop();
        assert_eq!(TIMER.time_left().as_str(), "00:00");
        assert!(!TIMER.is_running());
        assert_eq!(ALARM.pending(), 0);
    }

    #[test]
    fn test_stop_keeps_counters_until_restart() {
        countdown!(ALARM, TIMER);

        TIMER.start(1, None).unwrap();
        fire_ticks(&ALARM, 10);
        TIMER.stop();

        let (elapsed, target) = TIMER
            .inner
            .lock(|cell| (cell.borrow().elapsed_ms, cell.borrow().target_ms));
        assert_eq!(elapsed, 10 * TICK_INTERVAL_MS);
        assert_eq!(target, MS_PER_HOUR);

        TIMER.start(1, None).unwrap();
        assert_eq!(TIMER.time_left().as_str(), "01:00");
    }

    #[test]
    fn test_restart_discards_first_callback() {
        countdown!(ALARM, TIMER);
        static FIRST: AtomicU32 = AtomicU32::new(0);
        static SECOND: AtomicU32 = AtomicU32::new(0);
        fn on_first() {
            FIRST.fetch_add(1, Ordering::SeqCst);
        }
        fn on_second() {
            SECOND.fetch_add(1, Ordering::SeqCst);
        }

        TIMER.start(1, Some(on_first)).unwrap();
        fire_ticks(&ALARM, 30);

        TIMER.start(2, Some(on_second)).unwrap();
        assert_eq!(ALARM.pending(), 1);
        assert_eq!(TIMER.time_left().as_str(), "02:00");

        // The first countdown's remaining 30 ticks must not finish anything
        fire_ticks(&ALARM, 2 * 60 - 1);
        assert!(TIMER.is_running());
        assert_eq!(FIRST.load(Ordering::SeqCst), 0);
        assert_eq!(SECOND.load(Ordering::SeqCst), 0);

        fire_ticks(&ALARM, 1);
        assert!(!TIMER.is_running());
        assert_eq!(FIRST.load(Ordering::SeqCst), 0);
        assert_eq!(SECOND.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_tick_after_restart_is_ignored() {
        countdown!(ALARM, TIMER);
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }

        TIMER.start(0, Some(on_done)).unwrap();
        let old = current_handle(&TIMER).unwrap();

        TIMER.start(1, Some(on_done)).unwrap();
        let new = current_handle(&TIMER).unwrap();
        assert_ne!(old, new);

        // A tick for the replaced alarm that was already in flight
        assert_eq!(TIMER.on_alarm(old), Reschedule::Stop);
        assert_eq!(DONE.load(Ordering::SeqCst), 0);
        assert_eq!(TIMER.time_left().as_str(), "01:00");
        assert_eq!(current_handle(&TIMER), Some(new));
    }

    #[test]
    fn test_stale_tick_after_stop_is_ignored() {
        countdown!(ALARM, TIMER);
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }

        TIMER.start(0, Some(on_done)).unwrap();
        let handle = current_handle(&TIMER).unwrap();
        TIMER.stop();

        assert_eq!(TIMER.on_alarm(handle), Reschedule::Stop);
        assert_eq!(DONE.load(Ordering::SeqCst), 0);
        assert!(!TIMER.is_running());
    }

    #[test]
    fn test_handle_valid_only_while_running() {
        countdown!(ALARM, TIMER);

        assert_eq!(current_handle(&TIMER), None);
        TIMER.start(1, None).unwrap();
        assert!(current_handle(&TIMER).is_some());
        fire_ticks(&ALARM, 60);
        assert_eq!(current_handle(&TIMER), None);
    }

    #[test]
    fn test_callback_may_restart_timer() {
        countdown!(ALARM, TIMER);
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn restart() {
            if DONE.fetch_add(1, Ordering::SeqCst) == 0 {
                TIMER.start(1, Some(restart)).unwrap();
            }
        }

        TIMER.start(0, Some(restart)).unwrap();
        fire_ticks(&ALARM, 1);

        assert_eq!(DONE.load(Ordering::SeqCst), 1);
        assert!(TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "01:00");
        assert_eq!(ALARM.pending(), 1);

        fire_ticks(&ALARM, 60);
        assert_eq!(DONE.load(Ordering::SeqCst), 2);
        assert!(!TIMER.is_running());
    }

    #[test]
    fn test_start_without_free_alarm_stays_stopped() {
        static ALARM: SimAlarm<1> = SimAlarm::new();
        static TIMER: Countdown<SimAlarm<1>> = Countdown::new(&ALARM);

        struct Idle;
        impl AlarmHandler for Idle {
            fn on_alarm(&self, _handle: AlarmHandle) -> Reschedule {
                Reschedule::Stop
            }
        }
        static IDLE: Idle = Idle;

        // Someone else holds the only alarm
        ALARM.schedule(1_000, true, &IDLE).unwrap();

        assert_eq!(TIMER.start(1, None), Err(AlarmError::NoFreeAlarm));
        assert!(!TIMER.is_running());
        assert_eq!(TIMER.time_left().as_str(), "00:00");
        assert_eq!(current_handle(&TIMER), None);
    }

    #[test]
    fn test_restart_reuses_single_alarm_slot() {
        static ALARM: SimAlarm<1> = SimAlarm::new();
        static TIMER: Countdown<SimAlarm<1>> = Countdown::new(&ALARM);

        for hours in [1, 5, 24] {
            TIMER.start(hours, None).unwrap();
            assert_eq!(ALARM.pending(), 1);
        }
        assert_eq!(TIMER.time_left().as_str(), "24:00");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(25))]

        #[test]
        fn prop_full_run_fires_callback_once(hours in 1u8..=24) {
            countdown!(ALARM, TIMER);
            static DONE: AtomicU32 = AtomicU32::new(0);
            fn on_done() {
                DONE.fetch_add(1, Ordering::SeqCst);
            }

            let before = DONE.load(Ordering::SeqCst);
            TIMER.start(hours, Some(on_done)).unwrap();
            let expected = format!("{:02}:00", hours);
            let full = TIMER.time_left();
            prop_assert_eq!(full.as_str(), expected.as_str());

            fire_ticks(&ALARM, u32::from(hours) * 60 - 1);
            prop_assert!(TIMER.is_running());
            let last_minute = TIMER.time_left();
            prop_assert_eq!(last_minute.as_str(), "00:01");
            prop_assert_eq!(DONE.load(Ordering::SeqCst), before);

            fire_ticks(&ALARM, 1);
            prop_assert!(!TIMER.is_running());
            prop_assert_eq!(DONE.load(Ordering::SeqCst), before + 1);
            prop_assert_eq!(ALARM.pending(), 0);
        }
    }
}
