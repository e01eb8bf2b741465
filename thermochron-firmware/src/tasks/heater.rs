//! Heater control task
//!
//! Samples the on-die temperature sensor and runs the bang-bang
//! controller every poll interval. Targets come from the job task.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use thermochron_core::traits::HeaterController;
use thermochron_drivers::heater::{BangBangController, GpioHeater};
use thermochron_drivers::sensor::InternalTempSensor;
use thermochron_hal_rp2040::HeaterPin;

use crate::channels::{HEATER_CMD, LAST_TEMP};

/// The board's heater controller
pub type Controller = BangBangController<InternalTempSensor, GpioHeater<HeaterPin<'static>>>;

/// Heater control task
#[embassy_executor::task]
pub async fn heater_task(
    mut adc: Adc<'static, Async>,
    mut temp_channel: Channel<'static>,
    mut controller: Controller,
    poll_interval_ms: u32,
) {
    info!("Heater task started (poll every {} ms)", poll_interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(poll_interval_ms)));

    loop {
        if let Some(cmd) = HEATER_CMD.try_take() {
            match cmd.target_temp_c {
                Some(target) => {
                    controller.set_target(target);
                    controller.enable(true);
                    debug!("Heater target: {}°C", target);
                }
                None => {
                    controller.enable(false);
                    debug!("Heater disabled");
                }
            }
        }

        match adc.read(&mut temp_channel).await {
            Ok(raw) => controller.sensor_mut().record(raw),
            Err(e) => {
                warn!("ADC read error: {:?}", e);
                controller.sensor_mut().invalidate();
            }
        }

        if let Err(e) = controller.update() {
            warn!("Sensor fault: {:?}, heater off", e);
        }

        let reading = controller.last_reading_x10();
        LAST_TEMP.lock(|t| t.set(reading));
        if let Some(temp_x10) = reading {
            trace!("Temperature: {}.{}°C", temp_x10 / 10, (temp_x10 % 10).abs());
        }

        ticker.next().await;
    }
}
