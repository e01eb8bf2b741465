//! Software alarm service
//!
//! A deterministic [`AlarmService`] driven by a virtual microsecond clock.
//! Nothing fires on its own: the owner moves time forward with
//! [`SimAlarm::advance`] or jumps straight to the next deadline with
//! [`SimAlarm::fire_next`]. Handlers run synchronously on the caller's
//! stack, outside the internal critical section, so they may schedule or
//! cancel alarms themselves.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::alarm::{AlarmError, AlarmHandle, AlarmHandler, AlarmService, Reschedule};

/// A pending alarm
#[derive(Clone, Copy)]
struct Slot {
    handle: AlarmHandle,
    deadline_us: u64,
    handler: &'static dyn AlarmHandler,
}

/// The alarm whose handler is currently running
#[derive(Clone, Copy)]
struct Firing {
    handle: AlarmHandle,
    cancelled: bool,
}

struct Inner<const N: usize> {
    now_us: u64,
    next_id: u32,
    slots: [Option<Slot>; N],
    firing: Option<Firing>,
}

/// Virtual-clock alarm service with `N` alarm slots
pub struct SimAlarm<const N: usize = 4> {
    inner: Mutex<RefCell<Inner<N>>>,
}

impl<const N: usize> Default for SimAlarm<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SimAlarm<N> {
    /// Create a service with the clock at zero and no pending alarms
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                now_us: 0,
                next_id: 0,
                slots: [None; N],
                firing: None,
            })),
        }
    }

    /// Current virtual time in microseconds
    pub fn now_us(&self) -> u64 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).now_us)
    }

    /// Number of armed alarms
    pub fn pending(&self) -> usize {
        critical_section::with(|cs| {
            self.inner
                .borrow_ref(cs)
                .slots
                .iter()
                .filter(|s| s.is_some())
                .count()
        })
    }

    /// Move the clock forward by `delta_us`, firing every alarm that falls due
    ///
    /// Alarms fire in deadline order, with the clock set to each deadline
    /// while its handler runs. Alarms re-armed by their handler fire again
    /// within the same call if their new deadline is still inside the window.
    ///
    /// Returns the number of handler invocations.
    pub fn advance(&self, delta_us: u64) -> usize {
        let until = self.now_us().saturating_add(delta_us);
        let mut fired = 0;

        while let Some(slot) = self.take_earliest(Some(until)) {
            self.dispatch(slot);
            fired += 1;
        }

        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.now_us = inner.now_us.max(until);
        });

        fired
    }

    /// Jump the clock to the earliest pending deadline and fire that alarm
    ///
    /// Returns `false` if nothing was pending.
    pub fn fire_next(&self) -> bool {
        match self.take_earliest(None) {
            Some(slot) => {
                self.dispatch(slot);
                true
            }
            None => false,
        }
    }

    /// Remove the earliest pending alarm due at or before `until`
    ///
    /// Advances the clock to its deadline and marks it as firing.
    fn take_earliest(&self, until: Option<u64>) -> Option<Slot> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);

            let index = inner
                .slots
                .iter()
                .enumerate()
                .filter_map(|(i, s)| s.map(|s| (i, s)))
                .filter(|(_, s)| until.map_or(true, |limit| s.deadline_us <= limit))
                .min_by_key(|(_, s)| (s.deadline_us, s.handle.raw()))
                .map(|(i, _)| i)?;

            let slot = inner.slots[index].take()?;
            inner.now_us = inner.now_us.max(slot.deadline_us);
            inner.firing = Some(Firing {
                handle: slot.handle,
                cancelled: false,
            });
            Some(slot)
        })
    }

    /// Run a handler and re-arm it if it asks to fire again
    fn dispatch(&self, slot: Slot) {
        let next = slot.handler.on_alarm(slot.handle);

        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let cancelled = inner.firing.take().map_or(false, |f| f.cancelled);

            if let (Reschedule::After(delay_us), false) = (next, cancelled) {
                let deadline_us = inner.now_us.saturating_add(delay_us);
                if let Some(free) = inner.slots.iter_mut().find(|s| s.is_none()) {
                    *free = Some(Slot {
                        deadline_us,
                        ..slot
                    });
                }
            }
        });
    }
}

impl<const N: usize> AlarmService for SimAlarm<N> {
    fn schedule(
        &self,
        delay_us: u64,
        fire_if_past: bool,
        handler: &'static dyn AlarmHandler,
    ) -> Result<AlarmHandle, AlarmError> {
        // A zero delay is already due when it is armed
        if delay_us == 0 && !fire_if_past {
            return Err(AlarmError::Missed);
        }

        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);

            let index = inner
                .slots
                .iter()
                .position(Option::is_none)
                .ok_or(AlarmError::NoFreeAlarm)?;

            inner.next_id = inner.next_id.wrapping_add(1);
            let handle = AlarmHandle::from_raw(inner.next_id);
            let deadline_us = inner.now_us.saturating_add(delay_us);

            inner.slots[index] = Some(Slot {
                handle,
                deadline_us,
                handler,
            });

            Ok(handle)
        })
    }

    fn cancel(&self, handle: AlarmHandle) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);

            if let Some(firing) = inner.firing.as_mut() {
                if firing.handle == handle && !firing.cancelled {
                    firing.cancelled = true;
                    return true;
                }
            }

            match inner
                .slots
                .iter_mut()
                .find(|s| s.map_or(false, |s| s.handle == handle))
            {
                Some(slot) => {
                    *slot = None;
                    true
                }
                None => false,
            }
        })
    }
}
