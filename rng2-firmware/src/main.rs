//! RNG2 firmware
//!
//! Polls an RNG 2 Click (ECC204-class random number generator) over a
//! software I2C bus on two RP2040 GPIOs and logs the random output over RTT.
//! Pins, bus speed, device address and poll interval come from `rng2.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration};
use {defmt_rtt as _, panic_probe as _};

use rng2_drivers::Rng2;
use rng2_hal::EmbassyClock;
use rng2_hal_rp2040::FlexLine;

#[macro_use]
mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RNG2 firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let (scl, sda) = take_bus_pins!(p);
    let scl = FlexLine::new(scl);
    let sda = FlexLine::new(sda);
    info!(
        "Bus on SCL=gpio{} SDA=gpio{} at {} Hz",
        config::SCL_PIN,
        config::SDA_PIN,
        config::I2C_FREQUENCY_HZ
    );

    let rng = Rng2::new(scl, sda, Delay, EmbassyClock, config::rng2_config());
    let poll_interval = Duration::from_millis(config::POLL_INTERVAL_MS);

    spawner.spawn(tasks::rng_task(rng, poll_interval)).unwrap();
}
