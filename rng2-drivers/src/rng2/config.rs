//! Device configuration

use rng2_hal::i2c::I2cConfig;

/// Default 7-bit I2C address of the RNG2
pub const DEFAULT_ADDRESS: u8 = 0x33;

/// RNG2 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rng2Config {
    /// 7-bit I2C address
    pub address: u8,
    /// Bus speed and clock-stretch bound
    pub bus: I2cConfig,
    /// Time from the wake pulse until the device accepts commands (µs)
    pub wake_delay_us: u32,
    /// INFO execution time before the response can be read (µs)
    pub info_exec_us: u32,
    /// RANDOM execution time before the response can be read (µs)
    pub random_exec_us: u32,
}

impl Default for Rng2Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            bus: I2cConfig::STANDARD,
            wake_delay_us: 1_500,
            info_exec_us: 1_000,
            random_exec_us: 25_000,
        }
    }
}

impl Rng2Config {
    /// Set the I2C address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the bus configuration
    pub const fn with_bus(mut self, bus: I2cConfig) -> Self {
        self.bus = bus;
        self
    }

    /// Set the wake delay
    pub const fn with_wake_delay_us(mut self, us: u32) -> Self {
        self.wake_delay_us = us;
        self
    }

    /// Set both command execution times
    pub const fn with_exec_times_us(mut self, info_us: u32, random_us: u32) -> Self {
        self.info_exec_us = info_us;
        self.random_exec_us = random_us;
        self
    }
}
