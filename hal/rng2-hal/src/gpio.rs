//! GPIO line abstractions
//!
//! I2C lines are open-drain with an external pull-up: the master either
//! actively pulls a line low or lets it float, and the pull-up (or another
//! device on the bus) decides the level. A line is never driven high.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Open-drain signal line
///
/// Implementations hold a persistent, already-configured pin. Releasing and
/// pulling low are plain mode/level writes on that pin, and sampling never
/// changes the drive state.
///
/// These operations are infallible at this layer; a stuck line shows up as
/// a timeout or arbitration failure in the bus engine above.
pub trait OpenDrainLine {
    /// Sample the electrical level of the line
    fn is_high(&mut self) -> bool;

    /// Check if the line reads low
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }

    /// Stop driving the line and let the pull-up take it high
    fn release(&mut self);

    /// Actively pull the line low
    fn pull_low(&mut self);

    /// Drive a logic level using open-drain rules
    ///
    /// `true` releases the line, `false` pulls it low.
    fn set_level(&mut self, high: bool) {
        if high {
            self.release();
        } else {
            self.pull_low();
        }
    }
}

/// Adapter for `embedded-hal` pins configured as open-drain outputs
///
/// With an open-drain output, `set_high` disconnects the driver and
/// `set_low` sinks the line, which is exactly the release / pull-low pair.
/// The pin must be readable while released (input buffer enabled).
pub struct OpenDrain<P> {
    pin: P,
}

impl<P> OpenDrain<P>
where
    P: InputPin + OutputPin + ErrorType<Error = Infallible>,
{
    /// Wrap an open-drain pin, starting released
    pub fn new(pin: P) -> Self {
        let mut line = Self { pin };
        line.release();
        line
    }

    /// Return the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> OpenDrainLine for OpenDrain<P>
where
    P: InputPin + OutputPin + ErrorType<Error = Infallible>,
{
    fn is_high(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high,
            Err(never) => match never {},
        }
    }

    fn release(&mut self) {
        match self.pin.set_high() {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn pull_low(&mut self) {
        match self.pin.set_low() {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}
