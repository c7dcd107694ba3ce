//! RNG2 driver

use embedded_hal::delay::DelayNs;
use rng2_hal::gpio::OpenDrainLine;
use rng2_hal::time::Monotonic;
use rng2_protocol::command::{DEVICE_ID, INFO_SIZE, RANDOM_SIZE, SILICON_ID};
use rng2_protocol::{check_frame_length, Command, Response, WordAddress, MAX_FRAME_LEN};

use super::{Error, Info, PowerState, Rng2Config};
use crate::i2c::{BusError, SoftI2c};

/// RNG2 driver
///
/// Owns the bus it talks on.
pub struct Rng2<SCL, SDA, D, C> {
    bus: SoftI2c<SCL, SDA, D, C>,
    config: Rng2Config,
    power: PowerState,
}

impl<SCL, SDA, D, C> Rng2<SCL, SDA, D, C>
where
    SCL: OpenDrainLine,
    SDA: OpenDrainLine,
    D: DelayNs,
    C: Monotonic,
{
    /// Create a driver and its bus from two lines, a delay and a clock
    pub fn new(scl: SCL, sda: SDA, delay: D, clock: C, config: Rng2Config) -> Self {
        let bus = SoftI2c::new(scl, sda, delay, clock, config.bus);
        Self::from_bus(bus, config)
    }

    /// Create a driver on an existing bus
    ///
    /// `config.bus` is ignored; the bus keeps its own timing.
    pub fn from_bus(bus: SoftI2c<SCL, SDA, D, C>, config: Rng2Config) -> Self {
        Self {
            bus,
            config,
            power: PowerState::Sleep,
        }
    }

    /// Power state as last commanded
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Driver configuration
    pub fn config(&self) -> &Rng2Config {
        &self.config
    }

    /// Give back the bus
    pub fn release(self) -> SoftI2c<SCL, SDA, D, C> {
        self.bus
    }

    /// Write a word address byte on its own
    fn write_word_address(&mut self, word: WordAddress) -> Result<(), BusError> {
        self.bus.write_address(self.config.address, false)?;
        self.bus.write_byte(word.as_u8(), false, true)
    }

    /// Send a command frame
    ///
    /// The frame is built before the bus is touched, so an oversized command
    /// fails without any traffic.
    pub fn write_packet(&mut self, command: &Command) -> Result<(), Error> {
        let frame = command.encode_to_vec()?;

        self.bus.write_address(self.config.address, false)?;
        self.bus.write_byte(WordAddress::Command.as_u8(), false, false)?;
        for &byte in frame.iter() {
            self.bus.write_byte(byte, false, false)?;
        }
        self.bus.stop()?;
        Ok(())
    }

    /// Read one response frame
    ///
    /// `response` is only overwritten once the whole frame has been read and
    /// its CRC verified; on error it keeps its previous contents.
    pub fn read_packet(&mut self, response: &mut Response) -> Result<(), Error> {
        self.bus.write_address(self.config.address, true)?;

        let len = self.bus.read_byte(false, false)?;
        let size = match check_frame_length(len) {
            Ok(size) => size,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("rng2: malformed length byte {=u8}", len);

                // The device is still transmitting; refuse one more byte so it
                // lets go of SDA, then close the transaction
                let _ = self.bus.read_byte(true, true);
                return Err(e.into());
            }
        };

        let mut frame = [0u8; MAX_FRAME_LEN];
        frame[0] = len;
        let last = size - 1;
        for (i, slot) in frame[1..size].iter_mut().enumerate() {
            *slot = self.bus.read_byte(i + 1 == last, false)?;
        }
        self.bus.stop()?;

        match Response::decode(&frame[..size]) {
            Ok(decoded) => {
                *response = decoded;
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("rng2: rejected response frame: {}", e);
                Err(e.into())
            }
        }
    }

    /// Send a command, wait for it to execute and read the answer
    fn execute(&mut self, command: &Command, exec_us: u32) -> Result<Response, Error> {
        self.write_packet(command)?;
        self.bus.delay_us(exec_us);

        let mut response = Response::new();
        self.read_packet(&mut response)?;
        Ok(response)
    }

    /// Wake the device
    ///
    /// Sends the address with no data and a STOP. A sleeping device cannot
    /// acknowledge, so the outcome is not checked; this always completes and
    /// only waits out the wake delay.
    pub fn send_wake(&mut self) {
        let _ = self.bus.write_address(self.config.address, false);
        let _ = self.bus.stop();
        self.bus.delay_us(self.config.wake_delay_us);
        self.power = PowerState::Active;
    }

    /// Reset the device's I/O address counter
    pub fn reset_counter(&mut self) -> Result<(), Error> {
        self.write_word_address(WordAddress::Reset)?;
        Ok(())
    }

    /// Put the device into low-power sleep
    pub fn low_power_mode(&mut self) -> Result<(), Error> {
        self.write_word_address(WordAddress::Sleep)?;
        self.power = PowerState::Sleep;
        Ok(())
    }

    /// Bring the bus and the device's I/O state back to a known point
    ///
    /// Clocks out nine 1-bits between two STARTs so a slave interrupted
    /// mid-byte finishes and releases SDA, drains one byte with NACK, then
    /// resets the address counter.
    pub fn i2c_sync(&mut self) -> Result<(), Error> {
        // A stuck slave holds SDA low until its byte is clocked out
        tolerate_arbitration(self.bus.start())?;
        for _ in 0..9 {
            tolerate_arbitration(self.bus.write_bit(true))?;
        }
        self.bus.start()?;
        self.bus.stop()?;

        match self.drain() {
            Ok(()) => {}
            Err(BusError::Nack) => {
                // Asleep, or nothing to hand out
                #[cfg(feature = "defmt")]
                defmt::debug!("rng2: sync drain not acknowledged");
                self.bus.stop()?;
            }
            Err(e) => return Err(e.into()),
        }

        self.reset_counter()
    }

    fn drain(&mut self) -> Result<(), BusError> {
        self.bus.write_address(self.config.address, true)?;
        self.bus.read_byte(true, true)?;
        Ok(())
    }

    /// Read and check the INFO revision block
    pub fn read_info(&mut self) -> Result<Info, Error> {
        let response = self.execute(&Command::info(), self.config.info_exec_us)?;

        let data = response.data.as_slice();
        let revision: [u8; INFO_SIZE] = data.try_into().map_err(|_| Error::UnexpectedLength {
            expected: INFO_SIZE as u8,
            actual: data.len() as u8,
        })?;

        let info = Info { revision };
        if info.device_id() != DEVICE_ID || info.silicon_id() != SILICON_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "rng2: unexpected device id {=u8:#x} silicon id {=u8:#x}",
                info.device_id(),
                info.silicon_id()
            );
            return Err(Error::UnexpectedDevice {
                device_id: info.device_id(),
                silicon_id: info.silicon_id(),
            });
        }

        Ok(info)
    }

    /// Generate 32 random bytes
    pub fn read_random_num(&mut self) -> Result<[u8; RANDOM_SIZE], Error> {
        let response = self.execute(&Command::random()?, self.config.random_exec_us)?;

        let data = response.data.as_slice();
        data.try_into().map_err(|_| {
            #[cfg(feature = "defmt")]
            defmt::warn!("rng2: RANDOM returned {} bytes", data.len());
            Error::UnexpectedLength {
                expected: RANDOM_SIZE as u8,
                actual: data.len() as u8,
            }
        })
    }

    /// Fill `dest` with random bytes, one RANDOM command per 32 bytes
    ///
    /// On error `dest` may be partly filled.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        for chunk in dest.chunks_mut(RANDOM_SIZE) {
            let block = self.read_random_num()?;
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        Ok(())
    }
}

fn tolerate_arbitration(result: Result<(), BusError>) -> Result<(), BusError> {
    match result {
        Err(BusError::ArbitrationLost) => Ok(()),
        other => other,
    }
}
