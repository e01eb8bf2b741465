//! Hardware alarm service
//!
//! Uses TIMER alarm 1 and `TIMER_IRQ_1`. The embassy time driver owns
//! alarm 0, so the two never share a comparator.
//!
//! The comparator only matches the low 32 bits of the 64-bit microsecond
//! counter. Deadlines more than ~71 minutes out match early; the interrupt
//! handler checks the full deadline and re-arms until it is reached.
//!
//! One alarm can be pending at a time. A handler may schedule a new alarm
//! from inside its own firing, since the firing alarm no longer holds the
//! slot.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::pac;
use thermochron_hal::{AlarmError, AlarmHandle, AlarmHandler, AlarmService, Reschedule};

/// Comparator used by this service
const ALARM_NUM: usize = 1;

/// The alarm service instance bound to `TIMER_IRQ_1`
pub static ALARM: HardwareAlarm = HardwareAlarm::new();

#[derive(Clone, Copy)]
struct Slot {
    handle: AlarmHandle,
    deadline_us: u64,
    handler: &'static dyn AlarmHandler,
}

#[derive(Clone, Copy)]
struct Firing {
    handle: AlarmHandle,
    cancelled: bool,
}

struct Inner {
    next_id: u32,
    slot: Option<Slot>,
    firing: Option<Firing>,
}

/// Single-slot alarm service on the RP2040 system timer
pub struct HardwareAlarm {
    inner: Mutex<RefCell<Inner>>,
}

impl HardwareAlarm {
    const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                next_id: 0,
                slot: None,
                firing: None,
            })),
        }
    }

    /// Enable the alarm interrupt
    ///
    /// Call once, after `embassy_rp::init`.
    pub fn init(&'static self) {
        pac::TIMER.inte().modify(|w| w.set_alarm(ALARM_NUM, true));
        interrupt::TIMER_IRQ_1.unpend();
        // SAFETY: the handler below only touches state behind a critical section
        unsafe { interrupt::TIMER_IRQ_1.enable() };
    }

    /// Current value of the 64-bit microsecond counter
    pub fn now_us() -> u64 {
        let timer = pac::TIMER;
        loop {
            let hi = timer.timerawh().read();
            let lo = timer.timerawl().read();
            if timer.timerawh().read() == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
        }
    }

    /// Program the comparator, pending the interrupt if already due
    fn arm(deadline_us: u64) {
        pac::TIMER.alarm(ALARM_NUM).write_value(deadline_us as u32);
        if Self::now_us() >= deadline_us {
            // The comparator would not match until the low word wraps
            interrupt::TIMER_IRQ_1.pend();
        }
    }

    fn disarm() {
        pac::TIMER.armed().write(|w| w.set_armed(1 << ALARM_NUM));
    }

    fn on_interrupt(&self) {
        pac::TIMER.intr().write(|w| w.set_alarm(ALARM_NUM, true));
        let now = Self::now_us();

        let due = critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            match inner.slot {
                Some(slot) if slot.deadline_us <= now => {
                    inner.slot = None;
                    inner.firing = Some(Firing {
                        handle: slot.handle,
                        cancelled: false,
                    });
                    Some(slot)
                }
                Some(slot) => {
                    // Low word matched early
                    Self::arm(slot.deadline_us);
                    None
                }
                None => None,
            }
        });

        let Some(slot) = due else {
            return;
        };

        let next = slot.handler.on_alarm(slot.handle);

        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let cancelled = inner.firing.take().map_or(false, |f| f.cancelled);

            if let (Reschedule::After(delay_us), false) = (next, cancelled) {
                if inner.slot.is_some() {
                    // The handler scheduled a replacement; it wins
                    return;
                }
                // Relative to the previous deadline, so ticks do not drift
                let deadline_us = slot.deadline_us.saturating_add(delay_us);
                inner.slot = Some(Slot {
                    deadline_us,
                    ..slot
                });
                Self::arm(deadline_us);
            }
        });
    }
}

impl AlarmService for HardwareAlarm {
    fn schedule(
        &self,
        delay_us: u64,
        fire_if_past: bool,
        handler: &'static dyn AlarmHandler,
    ) -> Result<AlarmHandle, AlarmError> {
        if delay_us == 0 && !fire_if_past {
            return Err(AlarmError::Missed);
        }

        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.slot.is_some() {
                return Err(AlarmError::NoFreeAlarm);
            }

            inner.next_id = inner.next_id.wrapping_add(1);
            let handle = AlarmHandle::from_raw(inner.next_id);
            let deadline_us = Self::now_us().saturating_add(delay_us);

            inner.slot = Some(Slot {
                handle,
                deadline_us,
                handler,
            });
            Self::arm(deadline_us);

            #[cfg(feature = "defmt")]
            defmt::trace!("alarm {} armed for {} us", handle, deadline_us);

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

            match inner.slot {
                Some(slot) if slot.handle == handle => {
                    inner.slot = None;
                    Self::disarm();
                    #[cfg(feature = "defmt")]
                    defmt::trace!("alarm {} cancelled", handle);
                    true
                }
                _ => false,
            }
        })
    }
}

#[interrupt]
fn TIMER_IRQ_1() {
    ALARM.on_interrupt();
}
