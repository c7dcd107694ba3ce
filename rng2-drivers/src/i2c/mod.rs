//! Software I2C master
//!
//! A bit-banged I2C controller built from two open-drain lines, a delay
//! provider and a monotonic clock. Layers, bottom up:
//!
//! - bit level: START, repeated START, STOP, write-bit, read-bit
//! - byte level: write-byte / read-byte with ACK and NACK
//! - `embedded_hal::i2c::I2c` transactions on top of both

mod bitbang;
mod error;

#[cfg(test)]
pub(crate) mod sim;

pub use bitbang::{BusState, SoftI2c};
pub use error::BusError;
