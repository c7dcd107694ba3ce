//! Driver errors

use rng2_protocol::FrameError;

use crate::i2c::BusError;

/// Error from an RNG2 operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus fault: timeout, lost arbitration or NACK
    Bus(BusError),
    /// Frame could not be built or failed validation
    Frame(FrameError),
    /// Response payload has the wrong size for the command
    UnexpectedLength { expected: u8, actual: u8 },
    /// INFO answered, but not with the RNG2's identity
    UnexpectedDevice { device_id: u8, silicon_id: u8 },
}

impl Error {
    /// Whether this is a bus or framing fault rather than a well-formed
    /// answer with the wrong content
    ///
    /// Transport faults are worth an `i2c_sync` and a retry; the others
    /// point at the wrong device or a device in an unexpected mode.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Bus(_) | Error::Frame(_))
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}
