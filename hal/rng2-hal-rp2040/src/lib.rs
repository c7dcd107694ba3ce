//! RP2040 HAL for the RNG2 software I2C stack
//!
//! Implements the `rng2-hal` traits on embassy-rp:
//!
//! - [`gpio::FlexLine`] - open-drain bus line on a bidirectional GPIO
//! - [`take_pin!`] - take a GPIO by number from the peripherals, for
//!   config-driven pin assignment

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::FlexLine;
pub use rng2_hal::OpenDrainLine;
