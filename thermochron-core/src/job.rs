//! Job control
//!
//! A job is "hold the chamber at a target temperature for a number of
//! hours". [`Job`] owns the settings, runs the countdown and decides what
//! the heater should be doing. It answers `get`/`set` console commands
//! and is driven from a single task.

use thermochron_hal::AlarmService;
use thermochron_protocol::{Param, Response, ResponseError, Setting, StatusAction};

use crate::config::JobDefaults;
use crate::timer::{CompletionCallback, Countdown};

/// What the heater should be doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterCommand {
    /// Target temperature in °C (None = heater off)
    pub target_temp_c: Option<i16>,
}

impl HeaterCommand {
    /// Create an off command
    pub const fn off() -> Self {
        Self {
            target_temp_c: None,
        }
    }

    /// Create a heating command
    pub const fn heating(temp_c: i16) -> Self {
        Self {
            target_temp_c: Some(temp_c),
        }
    }
}

/// Operator settings, kept across stop/start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JobSettings {
    /// Target temperature (°C)
    pub target_temp_c: i16,
    /// Duration (hours)
    pub duration_h: u8,
}

impl From<JobDefaults> for JobSettings {
    fn from(defaults: JobDefaults) -> Self {
        Self {
            target_temp_c: defaults.temp_c,
            duration_h: defaults.duration_h,
        }
    }
}

/// Heating job bound to a countdown
pub struct Job<A: 'static> {
    countdown: &'static Countdown<A>,
    settings: JobSettings,
    /// Invoked from the alarm context when the countdown completes
    on_complete: Option<CompletionCallback>,
}

impl<A: AlarmService + Sync + 'static> Job<A> {
    /// Create a stopped job
    pub fn new(
        countdown: &'static Countdown<A>,
        settings: JobSettings,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        Self {
            countdown,
            settings,
            on_complete,
        }
    }

    /// Current settings
    pub fn settings(&self) -> JobSettings {
        self.settings
    }

    /// Check if the job is running
    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// What the heater should currently be doing
    pub fn heater_command(&self) -> HeaterCommand {
        if self.is_running() {
            HeaterCommand::heating(self.settings.target_temp_c)
        } else {
            HeaterCommand::off()
        }
    }

    /// Answer a `get` command
    ///
    /// `temp_x10` is the latest chamber reading in 0.1°C units, or `None`
    /// if the sensor has not produced a valid reading.
    pub fn get(&self, param: Param, temp_x10: Option<i16>) -> Response {
        match param {
            Param::Temp => match temp_x10 {
                Some(t) => Response::temperature(t),
                None => ResponseError::SensorFault.into(),
            },
            Param::Time => Response::value(&self.countdown.time_left()),
            Param::Status => {
                if self.is_running() {
                    Response::value("running")
                } else {
                    Response::value("stopped")
                }
            }
        }
    }

    /// Apply a `set` command
    ///
    /// Settings take effect immediately on a running job: a new duration
    /// restarts the countdown from the full duration.
    pub fn set(&mut self, setting: Setting) -> Response {
        match setting {
            Setting::Temp(temp_c) => {
                self.settings.target_temp_c = temp_c;
                Response::Ok
            }
            Setting::Time(hours) => {
                self.settings.duration_h = hours;
                if self.is_running() {
                    self.start()
                } else {
                    Response::Ok
                }
            }
            Setting::Status(StatusAction::Start) => self.start(),
            Setting::Status(StatusAction::Stop) => {
                self.countdown.stop();
                Response::Ok
            }
        }
    }

    fn start(&mut self) -> Response {
        match self
            .countdown
            .start(self.settings.duration_h, self.on_complete)
        {
            Ok(()) => Response::Ok,
            Err(_) => ResponseError::AlarmUnavailable.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use thermochron_hal::SimAlarm;
    use thermochron_protocol::MAX_RESPONSE_LEN;

    use crate::timer::TICK_INTERVAL_US;

    /// Declare a sim alarm, a countdown and a job with default settings
    macro_rules! job {
        ($job:ident, $alarm:ident, $timer:ident, $done:expr) => {
            static $alarm: SimAlarm = SimAlarm::new();
            static $timer: Countdown<SimAlarm> = Countdown::new(&$alarm);
            #[allow(unused_mut)]
            let mut $job = Job::new(&$timer, JobDefaults::default().into(), $done);
        };
    }

    fn line(response: Response) -> heapless::String<MAX_RESPONSE_LEN> {
        response.to_line()
    }

    #[test]
    fn test_defaults_stopped() {
        job!(job, ALARM, TIMER, None);

        assert!(!job.is_running());
        assert_eq!(job.heater_command(), HeaterCommand::off());
        assert_eq!(line(job.get(Param::Status, None)).as_str(), "OK:stopped");
        assert_eq!(line(job.get(Param::Time, None)).as_str(), "OK:00:00");
        assert_eq!(
            job.settings(),
            JobSettings {
                target_temp_c: 45,
                duration_h: 1
            }
        );
    }

    #[test]
    fn test_get_temp() {
        job!(job, ALARM, TIMER, None);

        assert_eq!(line(job.get(Param::Temp, Some(512))).as_str(), "OK:51.2");
        assert_eq!(
            line(job.get(Param::Temp, None)).as_str(),
            "ERR:sensor fault"
        );
    }

    #[test]
    fn test_start_and_stop() {
        job!(job, ALARM, TIMER, None);

        assert_eq!(job.set(Setting::Temp(60)), Response::Ok);
        assert_eq!(job.set(Setting::Time(3)), Response::Ok);
        assert!(!job.is_running());

        assert_eq!(job.set(Setting::Status(StatusAction::Start)), Response::Ok);
        assert!(job.is_running());
        assert_eq!(job.heater_command(), HeaterCommand::heating(60));
        assert_eq!(line(job.get(Param::Status, None)).as_str(), "OK:running");
        assert_eq!(line(job.get(Param::Time, None)).as_str(), "OK:03:00");

        ALARM.advance(15 * TICK_INTERVAL_US);
        assert_eq!(line(job.get(Param::Time, None)).as_str(), "OK:02:45");

        assert_eq!(job.set(Setting::Status(StatusAction::Stop)), Response::Ok);
        assert!(!job.is_running());
        assert_eq!(job.heater_command(), HeaterCommand::off());
        assert_eq!(line(job.get(Param::Time, None)).as_str(), "OK:00:00");

        // Stop keeps the settings
        assert_eq!(
            job.settings(),
            JobSettings {
                target_temp_c: 60,
                duration_h: 3
            }
        );
    }

    #[test]
    fn test_settings_applied_live() {
        job!(job, ALARM, TIMER, None);

        job.set(Setting::Status(StatusAction::Start));
        ALARM.advance(20 * TICK_INTERVAL_US);
        assert_eq!(line(job.get(Param::Time, None)).as_str(), "OK:00:40");

        job.set(Setting::Temp(50));
        assert_eq!(job.heater_command(), HeaterCommand::heating(50));

        job.set(Setting::Time(2));
        assert!(job.is_running());
        assert_eq!(line(job.get(Param::Time, None)).as_str(), "OK:02:00");
        assert_eq!(ALARM.pending(), 1);
    }

    #[test]
    fn test_completion_turns_heater_off() {
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }
        job!(job, ALARM, TIMER, Some(on_done));

        job.set(Setting::Time(1));
        job.set(Setting::Status(StatusAction::Start));
        ALARM.advance(60 * TICK_INTERVAL_US);

        assert_eq!(DONE.load(Ordering::SeqCst), 1);
        assert!(!job.is_running());
        assert_eq!(job.heater_command(), HeaterCommand::off());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        static DONE: AtomicU32 = AtomicU32::new(0);
        fn on_done() {
            DONE.fetch_add(1, Ordering::SeqCst);
        }
        job!(job, ALARM, TIMER, Some(on_done));

        job.set(Setting::Time(0));
        job.set(Setting::Status(StatusAction::Start));
        assert!(job.is_running());

        ALARM.advance(TICK_INTERVAL_US);
        assert_eq!(DONE.load(Ordering::SeqCst), 1);
        assert!(!job.is_running());
    }

    #[test]
    fn test_start_without_alarm_reports_error() {
        static ALARM: SimAlarm<0> = SimAlarm::new();
        static TIMER: Countdown<SimAlarm<0>> = Countdown::new(&ALARM);
        let mut job = Job::new(&TIMER, JobDefaults::default().into(), None);

        let response = job.set(Setting::Status(StatusAction::Start));
        assert_eq!(line(response).as_str(), "ERR:alarm unavailable");
        assert!(!job.is_running());
    }
}
