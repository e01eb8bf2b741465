//! Thermochron - Heated Chamber Firmware
//!
//! Holds a chamber at a target temperature for a set number of hours,
//! controlled over a line-based serial console. The job countdown ticks
//! once a minute from a dedicated hardware alarm.
//!
//! Named after the Greek "thermos" (warm) and "chronos" (time).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermochron_core::config::{HeaterConfig, JobDefaults};
use thermochron_core::timer::Countdown;
use thermochron_drivers::heater::{BangBangController, GpioHeater};
use thermochron_drivers::sensor::InternalTempSensor;
use thermochron_hal_rp2040::{HardwareAlarm, HeaterPin, ALARM};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Job countdown, ticked from TIMER alarm 1
static COUNTDOWN: Countdown<HardwareAlarm> = Countdown::new(&ALARM);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermochron firmware starting...");

    let p = embassy_rp::init(Default::default());
    ALARM.init();
    info!("Peripherals initialized");

    let heater_config = match config::HEATER.validate() {
        Ok(()) => config::HEATER,
        Err(e) => {
            warn!("Invalid heater config ({:?}), using defaults", e);
            HeaterConfig::default()
        }
    };
    let job_defaults = match config::JOB_DEFAULTS.validate() {
        Ok(()) => config::JOB_DEFAULTS,
        Err(e) => {
            warn!("Invalid job defaults ({:?}), using defaults", e);
            JobDefaults::default()
        }
    };
    info!(
        "Heater config: max_temp={}°C, hysteresis={}°C, active_low={}",
        heater_config.max_temp_c, heater_config.hysteresis_c, heater_config.active_low
    );

    // Serial console on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config::CONSOLE_BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("Console initialized at {} baud", config::CONSOLE_BAUDRATE);

    // On-die temperature sensor
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let temp_channel = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);

    // Heater output (GPIO15), driven to its idle level before anything else
    let idle = if heater_config.active_low {
        Level::High
    } else {
        Level::Low
    };
    let heater_pin = HeaterPin::new(Output::new(p.PIN_15, idle));
    let heater = GpioHeater::new(heater_pin, heater_config.active_low);
    let controller = BangBangController::new(InternalTempSensor::new(), heater, &heater_config);

    info!("ADC and heater initialized");

    spawner
        .spawn(tasks::heater_task(
            adc,
            temp_channel,
            controller,
            heater_config.poll_interval_ms,
        ))
        .unwrap();
    spawner
        .spawn(tasks::job_task(&COUNTDOWN, job_defaults))
        .unwrap();
    spawner.spawn(tasks::console_task(rx, tx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
