//! Behavioural model of the RNG2 for the simulated bus
//!
//! Bytes written in one transaction are handled at STOP according to the
//! word address in front of them. A command loads the next queued raw
//! response frame, which reads then walk through byte by byte.

use std::collections::VecDeque;

use crate::i2c::sim::Target;

pub struct Rng2Model {
    pub address: u8,
    pub awake: bool,
    /// Every non-empty write transaction, word address included
    pub writes: Vec<Vec<u8>>,
    /// Raw response frames handed out one per command
    pub responses: VecDeque<Vec<u8>>,
    pub resets: usize,
    rx: Vec<u8>,
    output: Vec<u8>,
    cursor: usize,
}

impl Rng2Model {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            awake: true,
            writes: Vec::new(),
            responses: VecDeque::new(),
            resets: 0,
            rx: Vec::new(),
            output: Vec::new(),
            cursor: 0,
        }
    }

    pub fn asleep(address: u8) -> Self {
        Self {
            awake: false,
            ..Self::new(address)
        }
    }

    /// Queue a raw response frame
    pub fn respond_raw(&mut self, frame: &[u8]) {
        self.responses.push_back(frame.to_vec());
    }

    /// Queue a well-formed response carrying `payload`
    pub fn respond(&mut self, payload: &[u8]) {
        let frame = rng2_protocol::Response::from_slice(payload)
            .and_then(|r| r.encode_to_vec())
            .unwrap();
        self.respond_raw(&frame);
    }

    /// Command frames received, without the word address
    pub fn commands(&self) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|w| w.first() == Some(&0x03))
            .map(|w| &w[1..])
            .collect()
    }
}

impl Target for Rng2Model {
    fn address_matches(&mut self, address: u8) -> bool {
        if address != self.address {
            return false;
        }
        if !self.awake {
            // The address pulse wakes it, but it cannot answer yet
            self.awake = true;
            return false;
        }
        true
    }

    fn start(&mut self) {
        self.rx.clear();
    }

    fn stop(&mut self) {
        let rx = std::mem::take(&mut self.rx);
        match rx.first() {
            Some(0x00) => {
                self.cursor = 0;
                self.resets += 1;
            }
            Some(0x01) => {
                self.awake = false;
                self.output.clear();
                self.cursor = 0;
            }
            Some(0x03) => {
                self.output = self.responses.pop_front().unwrap_or_default();
                self.cursor = 0;
            }
            _ => {}
        }
        if !rx.is_empty() {
            self.writes.push(rx);
        }
    }

    fn write(&mut self, byte: u8) -> bool {
        self.rx.push(byte);
        true
    }

    fn read(&mut self) -> u8 {
        let byte = self.output.get(self.cursor).copied().unwrap_or(0xFF);
        self.cursor += 1;
        byte
    }
}
