//! Frame layout, validation and response decoding
//!
//! Frame format:
//! - LENGTH (1 byte): total frame size, counting itself and the CRC
//! - BODY (LENGTH - 3 bytes): command fields + data, or response payload
//! - CRC (2 bytes): CRC-16 of LENGTH and BODY, low byte first

use heapless::Vec;

use crate::crc::crc16;

/// Smallest legal frame: length byte, one body byte, two CRC bytes
pub const MIN_FRAME_LEN: usize = 4;

/// Largest legal frame
pub const MAX_FRAME_LEN: usize = 87;

/// Bytes of a frame that are not body: length byte + CRC
pub const FRAME_OVERHEAD: usize = 3;

/// Maximum optional data carried by a command
pub const MAX_DATA_SIZE: usize = 80;

/// Maximum payload carried by a response
pub const MAX_RESPONSE_DATA: usize = MAX_FRAME_LEN - FRAME_OVERHEAD;

/// Errors that can occur during frame encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Command data exceeds [`MAX_DATA_SIZE`]
    PayloadTooLarge,
    /// Length byte outside `[MIN_FRAME_LEN, MAX_FRAME_LEN]`, or not matching
    /// the bytes supplied
    InvalidLength(u8),
    /// Trailing CRC does not match the frame contents
    CrcMismatch,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Validate a received length byte
///
/// Returns the frame size in bytes. Anything outside the legal range is
/// malformed and must be rejected before any CRC work.
pub fn check_frame_length(len: u8) -> Result<usize, FrameError> {
    let size = len as usize;
    if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&size) {
        return Err(FrameError::InvalidLength(len));
    }
    Ok(size)
}

/// A validated response payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Payload bytes between the length byte and the CRC
    pub data: Vec<u8, MAX_RESPONSE_DATA>,
}

impl Response {
    /// Create an empty response
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Decode a complete frame
    ///
    /// `frame` must hold exactly the number of bytes announced by its
    /// length byte. The payload is only returned once the CRC checks out.
    pub fn decode(frame: &[u8]) -> Result<Self, FrameError> {
        let len = *frame.first().ok_or(FrameError::InvalidLength(0))?;
        let size = check_frame_length(len)?;
        if frame.len() != size {
            return Err(FrameError::InvalidLength(len));
        }

        let (body, crc) = frame.split_at(size - 2);
        let received = u16::from_le_bytes([crc[0], crc[1]]);
        if crc16(body) != received {
            return Err(FrameError::CrcMismatch);
        }

        let mut data = Vec::new();
        data.extend_from_slice(&body[1..])
            .map_err(|_| FrameError::InvalidLength(len))?;
        Ok(Self { data })
    }

    /// Encode this response as the device would send it
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let size = self.data.len() + FRAME_OVERHEAD;
        if self.data.is_empty() {
            return Err(FrameError::InvalidLength(size as u8));
        }
        if buffer.len() < size {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = size as u8;
        buffer[1..size - 2].copy_from_slice(&self.data);
        let crc = crc16(&buffer[..size - 2]).to_le_bytes();
        buffer[size - 2..size].copy_from_slice(&crc);

        Ok(size)
    }

    /// Encode this response into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Build a response from a payload slice
    pub fn from_slice(payload: &[u8]) -> Result<Self, FrameError> {
        let mut data = Vec::new();
        data.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { data })
    }

    /// Payload length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
