//! Bit-banged I2C engine
//!
//! Lines are never driven high: a `1` is sent by releasing the line and
//! letting the pull-up raise it. After every clock release the engine waits
//! for SCL to actually rise (the slave may stretch it), bounded by a
//! deadline on the monotonic clock.
//!
//! Whenever this side releases a line and expects it high, it reads it back.
//! Seeing it low means someone else is driving the bus and the operation
//! fails with [`BusError::ArbitrationLost`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use rng2_hal::gpio::OpenDrainLine;
use rng2_hal::i2c::{BusTiming, I2cConfig};
use rng2_hal::time::{Deadline, Monotonic};

use super::BusError;

/// Whether a START condition is currently open on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No transaction open; the next START is a plain START
    Idle,
    /// A START was issued and no STOP followed; the next START is repeated
    Started,
}

/// Software I2C master
///
/// Owns both lines for its whole lifetime. Operations are blocking and
/// run to completion once they start toggling lines.
pub struct SoftI2c<SCL, SDA, D, C> {
    scl: SCL,
    sda: SDA,
    delay: D,
    clock: C,
    timing: BusTiming,
    state: BusState,
}

impl<SCL, SDA, D, C> SoftI2c<SCL, SDA, D, C>
where
    SCL: OpenDrainLine,
    SDA: OpenDrainLine,
    D: DelayNs,
    C: Monotonic,
{
    /// Create a new bus master and release both lines
    pub fn new(scl: SCL, sda: SDA, delay: D, clock: C, config: I2cConfig) -> Self {
        let mut bus = Self {
            scl,
            sda,
            delay,
            clock,
            timing: config.timing(),
            state: BusState::Idle,
        };
        bus.sda.release();
        bus.scl.release();
        bus
    }

    /// Current bus state
    pub fn state(&self) -> BusState {
        self.state
    }

    /// Bit-level timing in use
    pub fn timing(&self) -> &BusTiming {
        &self.timing
    }

    /// Block for `us` microseconds using the bus delay provider
    pub fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    /// Give back the lines, delay and clock
    pub fn release(self) -> (SCL, SDA, D, C) {
        (self.scl, self.sda, self.delay, self.clock)
    }

    fn half_period(&mut self) {
        self.delay.delay_ns(self.timing.half_period_ns);
    }

    /// Release SCL and wait until it is observed high
    fn release_scl(&mut self) -> Result<(), BusError> {
        self.scl.release();
        let deadline = Deadline::after(&self.clock, self.timing.stretch_timeout_us);
        while self.scl.is_low() {
            if deadline.expired(&self.clock) {
                return Err(BusError::Timeout);
            }
        }
        Ok(())
    }

    /// Issue a START, or a repeated START if one is already open
    pub fn start(&mut self) -> Result<(), BusError> {
        match self.state {
            BusState::Started => {
                // SCL is low here: raise SDA first so the falling edge
                // below happens with SCL high
                self.sda.release();
                self.half_period();
                self.release_scl()?;
                self.half_period();
            }
            BusState::Idle => {
                self.sda.release();
                self.release_scl()?;
                if self.sda.is_low() {
                    return Err(BusError::ArbitrationLost);
                }
            }
        }

        self.sda.pull_low();
        self.half_period();
        self.scl.pull_low();
        self.state = BusState::Started;
        Ok(())
    }

    /// Issue a STOP
    ///
    /// The bus is considered idle afterwards even if the STOP fails.
    pub fn stop(&mut self) -> Result<(), BusError> {
        self.state = BusState::Idle;

        self.sda.pull_low();
        self.half_period();
        self.release_scl()?;
        self.delay.delay_ns(self.timing.bus_free_ns);
        self.sda.release();
        self.half_period();

        if self.sda.is_low() {
            return Err(BusError::ArbitrationLost);
        }
        Ok(())
    }

    /// Clock out one bit
    pub fn write_bit(&mut self, bit: bool) -> Result<(), BusError> {
        self.sda.set_level(bit);
        self.half_period();
        self.release_scl()?;
        self.half_period();

        let lost = bit && self.sda.is_low();
        // Finish the clock pulse either way so SCL is never left high mid-byte
        self.scl.pull_low();

        if lost {
            return Err(BusError::ArbitrationLost);
        }
        Ok(())
    }

    /// Clock in one bit driven by the slave
    pub fn read_bit(&mut self) -> Result<bool, BusError> {
        self.sda.release();
        self.half_period();
        self.release_scl()?;
        self.half_period();

        let bit = self.sda.is_high();
        self.scl.pull_low();
        Ok(bit)
    }

    /// Send one byte MSB-first and check the acknowledge bit
    ///
    /// STOP is only sent when every earlier step succeeded.
    pub fn write_byte(&mut self, byte: u8, send_start: bool, send_stop: bool) -> Result<(), BusError> {
        if send_start {
            self.start()?;
        }

        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 != 0)?;
        }

        // ACK is the slave pulling SDA low
        if self.read_bit()? {
            return Err(BusError::Nack);
        }

        if send_stop {
            self.stop()?;
        }
        Ok(())
    }

    /// Receive one byte MSB-first, then answer with ACK or NACK
    ///
    /// `nack` tells the slave this is the last byte it should send.
    pub fn read_byte(&mut self, nack: bool, send_stop: bool) -> Result<u8, BusError> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit()? as u8;
        }

        self.write_bit(nack)?;

        if send_stop {
            self.stop()?;
        }
        Ok(byte)
    }

    /// START (or repeated START) followed by the address byte
    pub fn write_address(&mut self, address: SevenBitAddress, read: bool) -> Result<(), BusError> {
        self.write_byte((address << 1) | read as u8, true, false)
    }

    fn run_transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), BusError> {
        let mut previous: Option<bool> = None;

        for i in 0..operations.len() {
            let next_is_read = operations
                .get(i + 1)
                .map(|op| matches!(op, Operation::Read(_)));
            let op = &mut operations[i];
            let is_read = matches!(op, Operation::Read(_));

            // Adjacent operations of the same kind share one address phase
            if previous != Some(is_read) {
                self.write_address(address, is_read)?;
            }

            match op {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        self.write_byte(byte, false, false)?;
                    }
                }
                Operation::Read(buffer) => {
                    let ends_read_run = next_is_read != Some(true);
                    let count = buffer.len();
                    for (j, slot) in buffer.iter_mut().enumerate() {
                        let last = ends_read_run && j + 1 == count;
                        *slot = self.read_byte(last, false)?;
                    }
                }
            }

            previous = Some(is_read);
        }

        if previous.is_some() {
            self.stop()?;
        }
        Ok(())
    }
}

impl<SCL, SDA, D, C> ErrorType for SoftI2c<SCL, SDA, D, C> {
    type Error = BusError;
}

impl<SCL, SDA, D, C> I2c<SevenBitAddress> for SoftI2c<SCL, SDA, D, C>
where
    SCL: OpenDrainLine,
    SDA: OpenDrainLine,
    D: DelayNs,
    C: Monotonic,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let result = self.run_transaction(address, operations);
        if result == Err(BusError::Nack) {
            // Release the bus after a refused byte; the NACK is what we report
            let _ = self.stop();
        }
        result
    }
}
