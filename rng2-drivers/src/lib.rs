//! Driver implementations
//!
//! This crate provides the bus engine and device driver built on the
//! traits defined in `rng2-hal`:
//!
//! - Software (bit-banged) I2C master over two open-drain lines
//! - RNG2 random number generator driver (wake, sleep, info, random)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod rng2;

pub use i2c::{BusError, BusState, SoftI2c};
pub use rng2::{Error, Info, PowerState, Rng2, Rng2Config};
