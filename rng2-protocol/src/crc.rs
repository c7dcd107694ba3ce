//! CRC-16 used by RNG2 command and response frames
//!
//! Parameters: width 16, polynomial 0x8005, init 0x0000, input bytes
//! reflected, output not reflected, no final XOR. The device rejects any
//! frame whose CRC differs, so this must match bit for bit.

/// CRC-16 generator polynomial (x^16 + x^15 + x^2 + 1)
pub const POLYNOMIAL: u16 = 0x8005;

/// Calculate the frame CRC over `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &byte in data {
        crc ^= (byte.reverse_bits() as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Calculate the frame CRC in wire order (low byte first)
pub fn crc16_le(data: &[u8]) -> [u8; 2] {
    crc16(data).to_le_bytes()
}
