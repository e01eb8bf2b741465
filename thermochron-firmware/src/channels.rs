//! Inter-task communication channels
//!
//! Defines the statics used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use thermochron_core::job::HeaterCommand;
use thermochron_protocol::{Command, Response};

/// Get/set requests from the console to the job task
pub static JOB_REQUEST: Channel<CriticalSectionRawMutex, Command, 1> = Channel::new();

/// Job task answers, one per request
pub static JOB_RESPONSE: Channel<CriticalSectionRawMutex, Response, 1> = Channel::new();

/// Heater command signal (updated by the job task)
pub static HEATER_CMD: Signal<CriticalSectionRawMutex, HeaterCommand> = Signal::new();

/// Raised from the alarm interrupt when the countdown finishes
pub static JOB_COMPLETE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest chamber temperature in 0.1°C units, or None for sensor fault
///
/// Written by the heater task, read on demand by the job task.
pub static LAST_TEMP: Mutex<CriticalSectionRawMutex, Cell<Option<i16>>> =
    Mutex::new(Cell::new(None));

/// Read the latest temperature
pub fn last_temp() -> Option<i16> {
    LAST_TEMP.lock(|t| t.get())
}
