//! I2C bus configuration
//!
//! Speed and timeout settings for a software I2C master, and the per-phase
//! delays derived from them.

/// Default bound on how long a slave may stretch the clock (25 ms)
pub const DEFAULT_STRETCH_TIMEOUT_US: u32 = 25_000;

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Longest time to wait for SCL to rise after releasing it, in µs
    pub stretch_timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        stretch_timeout_us: DEFAULT_STRETCH_TIMEOUT_US,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        stretch_timeout_us: DEFAULT_STRETCH_TIMEOUT_US,
    };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
        stretch_timeout_us: DEFAULT_STRETCH_TIMEOUT_US,
    };

    /// Set the clock frequency
    pub const fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the clock-stretch timeout
    pub const fn with_stretch_timeout_us(mut self, timeout_us: u32) -> Self {
        self.stretch_timeout_us = timeout_us;
        self
    }

    /// Derive the bit-level delays for this configuration
    pub fn timing(&self) -> BusTiming {
        BusTiming::from_config(self)
    }
}

/// Delays used by the bit-level engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusTiming {
    /// Half of one SCL period; used for setup, hold and propagation waits
    pub half_period_ns: u32,
    /// Bus free time between STOP and the next START (tBUF)
    pub bus_free_ns: u32,
    /// Clock-stretch bound in µs
    pub stretch_timeout_us: u32,
}

impl BusTiming {
    /// Compute timing for a configuration
    ///
    /// A zero frequency is treated as 1 Hz rather than dividing by zero.
    pub fn from_config(config: &I2cConfig) -> Self {
        let frequency = config.frequency.max(1);
        let half_period_ns = (1_000_000_000 / (2 * frequency as u64)).min(u32::MAX as u64) as u32;

        // tBUF minimums from the I2C specification
        let bus_free_ns = if frequency <= 100_000 {
            4_700
        } else if frequency <= 400_000 {
            1_300
        } else {
            500
        };

        Self {
            half_period_ns,
            bus_free_ns: bus_free_ns.max(half_period_ns),
            stretch_timeout_us: config.stretch_timeout_us,
        }
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::from_config(&I2cConfig::default())
    }
}
