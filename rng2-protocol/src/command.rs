//! Command packets and device constants
//!
//! A command is an opcode, two parameters and optional data. It is written
//! to the command word address as one frame.

use heapless::Vec;

use crate::crc::crc16;
use crate::frame::{FrameError, MAX_DATA_SIZE, MAX_FRAME_LEN};

/// Command opcodes
pub mod opcode {
    /// Read a configuration or data zone word
    pub const READ: u8 = 0x02;
    /// Generate 32 random bytes
    pub const RANDOM: u8 = 0x16;
    /// Query device revision / state
    pub const INFO: u8 = 0x30;
    /// Run the built-in self test
    pub const SELFTEST: u8 = 0x77;
}

/// INFO mode returning the 4-byte revision block
///
/// Mode 0x00 ("Revision") in the datasheet's INFO mode table. Mode 0x01
/// reads key-valid state and does not carry the device and silicon IDs.
pub const INFO_MODE_REVISION: u8 = 0x00;

/// Expected device ID at offset 1 of the INFO revision block
pub const DEVICE_ID: u8 = 0xD0;

/// Expected silicon ID at offset 2 of the INFO revision block
pub const SILICON_ID: u8 = 0x20;

/// Size of the INFO revision block
pub const INFO_SIZE: usize = 4;

/// Size of the input block sent with RANDOM
pub const RANDOM_INPUT_SIZE: usize = 20;

/// Size of the RANDOM output
pub const RANDOM_SIZE: usize = 32;

/// Fixed frame bytes around the data: length, opcode, param1, param2 (2), CRC (2)
pub const COMMAND_OVERHEAD: usize = 7;

/// Word addresses selecting the device sub-channel of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WordAddress {
    /// Reset the I/O address counter
    Reset = 0x00,
    /// Enter low-power sleep
    Sleep = 0x01,
    /// A command frame follows
    Command = 0x03,
}

impl WordAddress {
    /// Raw byte value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A command packet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Command opcode
    pub opcode: u8,
    /// First parameter (mode)
    pub param1: u8,
    /// Second parameter, sent little-endian
    pub param2: u16,
    /// Optional command data
    pub data: Vec<u8, MAX_DATA_SIZE>,
}

impl Command {
    /// Create a new command
    pub fn new(opcode: u8, param1: u8, param2: u16, data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > MAX_DATA_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut data_vec = Vec::new();
        data_vec
            .extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            opcode,
            param1,
            param2,
            data: data_vec,
        })
    }

    /// Create a command with no data
    pub fn empty(opcode: u8, param1: u8, param2: u16) -> Self {
        Self {
            opcode,
            param1,
            param2,
            data: Vec::new(),
        }
    }

    /// INFO command reading the revision block
    pub fn info() -> Self {
        Self::empty(opcode::INFO, INFO_MODE_REVISION, 0)
    }

    /// RANDOM command with a zeroed input block
    pub fn random() -> Result<Self, FrameError> {
        Self::new(opcode::RANDOM, 0, 0, &[0; RANDOM_INPUT_SIZE])
    }

    /// Value of the length byte, which is also the total frame size
    pub fn frame_len(&self) -> usize {
        self.data.len() + COMMAND_OVERHEAD
    }

    /// Encode this command into a byte buffer
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        if self.data.len() > MAX_DATA_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let len = self.frame_len();
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let [p2_lo, p2_hi] = self.param2.to_le_bytes();
        buffer[0] = len as u8;
        buffer[1] = self.opcode;
        buffer[2] = self.param1;
        buffer[3] = p2_lo;
        buffer[4] = p2_hi;
        buffer[5..5 + self.data.len()].copy_from_slice(&self.data);

        let crc = crc16(&buffer[..len - 2]).to_le_bytes();
        buffer[len - 2..len].copy_from_slice(&crc);

        Ok(len)
    }

    /// Encode this command into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}
