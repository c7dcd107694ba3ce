//! RNG2 random number generator
//!
//! The RNG2 click carries an ECC204-class secure element on I2C. This
//! driver talks to it over [`SoftI2c`](crate::i2c::SoftI2c) and implements
//! the handful of operations needed to pull random numbers out of it:
//!
//! - wake / sleep / reset of the I/O address counter
//! - bus recovery (`i2c_sync`)
//! - INFO, checked against the expected device and silicon IDs
//! - RANDOM, 32 bytes per command
//!
//! # Transaction shape
//!
//! ```text
//! write:  S [addr|W] A [word address] A [frame bytes...] A P
//! read:   S [addr|R] A [len] A [byte] A ... [last] N P
//! ```
//!
//! Nothing is retried here. Callers that see a transport error are expected
//! to run [`Rng2::i2c_sync`] and try again.

mod config;
mod driver;
mod error;

#[cfg(test)]
mod model;

pub use config::{Rng2Config, DEFAULT_ADDRESS};
pub use driver::Rng2;
pub use error::Error;

use rng2_protocol::command::INFO_SIZE;

/// Power state as last commanded by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Woken and able to execute commands
    Active,
    /// Sent to low-power sleep (also the state after power-up)
    Sleep,
}

/// INFO revision block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Info {
    /// Raw 4-byte revision block
    pub revision: [u8; INFO_SIZE],
}

impl Info {
    /// Device ID byte
    pub fn device_id(&self) -> u8 {
        self.revision[1]
    }

    /// Silicon ID byte
    pub fn silicon_id(&self) -> u8 {
        self.revision[2]
    }
}
