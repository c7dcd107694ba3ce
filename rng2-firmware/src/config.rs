//! Board configuration
//!
//! Constants and the pin macro are generated by build.rs from `rng2.toml`,
//! which is validated at compile time.

use rng2_drivers::Rng2Config;
use rng2_hal::I2cConfig;

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Driver configuration for the configured board
pub fn rng2_config() -> Rng2Config {
    let bus = I2cConfig::STANDARD
        .with_frequency(I2C_FREQUENCY_HZ)
        .with_stretch_timeout_us(STRETCH_TIMEOUT_US);

    Rng2Config::default()
        .with_address(DEVICE_ADDRESS)
        .with_bus(bus)
}
