//! Open-drain lines on RP2040 GPIOs
//!
//! The RP2040 has no true open-drain output mode. It is emulated by latching
//! the output register low once and then only switching the pad direction:
//! output enabled pulls the line low, output disabled lets the external
//! pull-up raise it. The pin is never driven high.

use embassy_rp::gpio::{AnyPin, Flex, Pull};
use embassy_rp::Peri;
use rng2_hal::OpenDrainLine;

/// Open-drain I2C line on a persistent `Flex` pin
pub struct FlexLine<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexLine<'d> {
    /// Configure `pin` as a released open-drain line
    ///
    /// The internal pull-up is enabled as a fallback; boards are still
    /// expected to fit proper bus pull-ups.
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::Up);
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }
}

impl OpenDrainLine for FlexLine<'_> {
    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }

    fn pull_low(&mut self) {
        // Output latch is already low
        self.pin.set_as_output();
    }
}
