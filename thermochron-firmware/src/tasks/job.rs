//! Job task
//!
//! Owns the [`Job`] and serializes every change to it: console requests
//! and countdown completion. After each event the heater is told what to
//! do.

use defmt::*;
use embassy_futures::select::{select, Either};

use thermochron_core::config::JobDefaults;
use thermochron_core::job::Job;
use thermochron_core::timer::Countdown;
use thermochron_hal_rp2040::HardwareAlarm;
use thermochron_protocol::{Command, Response};

use crate::channels::{last_temp, HEATER_CMD, JOB_COMPLETE, JOB_REQUEST, JOB_RESPONSE};

/// Runs in the alarm interrupt; only signals
fn on_countdown_complete() {
    JOB_COMPLETE.signal(());
}

/// Job task - answers get/set requests and reacts to completion
#[embassy_executor::task]
pub async fn job_task(countdown: &'static Countdown<HardwareAlarm>, defaults: JobDefaults) {
    info!(
        "Job task started (defaults: {}°C, {} h)",
        defaults.temp_c, defaults.duration_h
    );

    let mut job = Job::new(countdown, defaults.into(), Some(on_countdown_complete));
    HEATER_CMD.signal(job.heater_command());

    loop {
        match select(JOB_REQUEST.receive(), JOB_COMPLETE.wait()).await {
            Either::First(command) => {
                let response = match command {
                    Command::Get(param) => job.get(param, last_temp()),
                    Command::Set(setting) => {
                        let response = job.set(setting);
                        debug!("Set {:?} -> {}", setting, response.is_ok());
                        response
                    }
                    // The console answers help itself
                    Command::Help => Response::Ok,
                };
                JOB_RESPONSE.send(response).await;
            }
            Either::Second(()) => {
                info!("Job complete, heater off");
            }
        }

        HEATER_CMD.signal(job.heater_command());
    }
}
