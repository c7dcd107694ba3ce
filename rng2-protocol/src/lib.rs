//! RNG2 Command Protocol
//!
//! This crate defines the framed command/response protocol spoken by the
//! RNG2 random number generator over I2C. It is transport-agnostic: the
//! bit-banged bus in `rng2-drivers` moves the bytes, this crate builds and
//! checks them.
//!
//! # Protocol Overview
//!
//! Every transaction is addressed to a one-byte *word address* that selects
//! a sub-channel of the device (reset, sleep, command). Commands and
//! responses are self-describing, length-prefixed and CRC-suffixed:
//! ```text
//! Command (word address 0x03):
//! ┌────────┬────────┬────────┬──────────┬──────────┬──────────┐
//! │ LENGTH │ OPCODE │ PARAM1 │ PARAM2   │ DATA     │ CRC-16   │
//! │ 1B     │ 1B     │ 1B     │ 2B (LE)  │ 0–80B    │ 2B (LE)  │
//! └────────┴────────┴────────┴──────────┴──────────┴──────────┘
//!
//! Response:
//! ┌────────┬─────────────┬──────────┐
//! │ LENGTH │ PAYLOAD     │ CRC-16   │
//! │ 1B     │ 1–84B       │ 2B (LE)  │
//! └────────┴─────────────┴──────────┘
//! ```
//!
//! LENGTH counts every byte of the frame including itself and the CRC.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod crc;
pub mod frame;

pub use command::{opcode, Command, WordAddress};
pub use crc::{crc16, crc16_le};
pub use frame::{
    check_frame_length, FrameError, Response, MAX_DATA_SIZE, MAX_FRAME_LEN, MAX_RESPONSE_DATA,
    MIN_FRAME_LEN,
};
