//! I2C bus errors

use embedded_hal::i2c::{Error, ErrorKind, NoAcknowledgeSource};

/// Error from a bus operation
///
/// Each variant is fatal to the operation in flight. The bus is left in
/// whatever state the last completed step put it; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// SCL did not rise before the clock-stretch deadline
    Timeout,
    /// A released line was observed low: another participant is driving it
    ArbitrationLost,
    /// The addressed device answered a byte with NACK
    Nack,
}

impl Error for BusError {
    fn kind(&self) -> ErrorKind {
        match self {
            BusError::Timeout => ErrorKind::Other,
            BusError::ArbitrationLost => ErrorKind::ArbitrationLoss,
            BusError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
        }
    }
}
