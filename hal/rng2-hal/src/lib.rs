//! RNG2 Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the software I2C
//! master is written against. Chip-specific crates (RP2040, etc.) implement
//! them so the same bus engine and device driver run on any board, and on
//! the host under test.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (rng2-firmware, etc.)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rng2-drivers (SoftI2c, Rng2)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rng2-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ rng2-hal-     │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OpenDrainLine`] - Open-drain signal line (release / pull low / sample)
//! - [`time::Monotonic`] - Free-running microsecond clock for bounded waits
//! - [`i2c::I2cConfig`] - Bus speed and clock-stretch timeout

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{OpenDrain, OpenDrainLine};
pub use i2c::{BusTiming, I2cConfig};
pub use time::{Deadline, Monotonic};

#[cfg(feature = "embassy-time")]
pub use time::EmbassyClock;
