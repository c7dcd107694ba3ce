//! Simulated open-drain bus for tests
//!
//! Both lines are wired-AND: a line is high only when nobody pulls it low.
//! Every master line operation updates the levels and feeds the edges into
//! a byte-level slave state machine, which answers through a [`Target`].
//! Tests can inject faults (lines held low, clock stretching) directly on
//! the shared [`SimBus`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use rng2_hal::gpio::OpenDrainLine;
use rng2_hal::i2c::I2cConfig;
use rng2_hal::time::Monotonic;

use super::SoftI2c;

/// Byte-level behaviour of a simulated slave
pub trait Target {
    /// Whether this target answers the 7-bit address
    fn address_matches(&mut self, address: u8) -> bool;
    /// START or repeated START seen
    fn start(&mut self) {}
    /// STOP seen
    fn stop(&mut self) {}
    /// Byte written by the master; return `true` to ACK it
    fn write(&mut self, byte: u8) -> bool;
    /// Next byte to send to the master
    fn read(&mut self) -> u8;
}

/// Master line operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    ReleaseScl,
    PullScl,
    ReleaseSda,
    PullSda,
}

/// Electrical event observed on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Stop,
    SclRise,
    SclFall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum After {
    Receive,
    Transmit,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Receive { bits: u8, shift: u8, address: bool },
    SlaveAck { then: After },
    Transmit { bits: u8, byte: u8 },
    MasterAck { acked: bool },
}

/// Shared state of the simulated bus
pub struct SimBus<T> {
    master_scl_low: bool,
    master_sda_low: bool,
    slave_sda_low: bool,
    /// SCL samples left before a stretching slave lets go
    stretch_remaining: u32,
    /// Clock stretch applied to every SCL release, in samples
    pub stretch_per_clock: u32,
    /// Stuck clock line
    pub hold_scl: bool,
    /// Stuck data line, or another master driving it
    pub hold_sda: bool,
    /// SDA held low for this many more SCL falls, like a slave interrupted
    /// mid-byte
    pub stuck_sda_clocks: u32,
    scl: bool,
    sda: bool,
    phase: Phase,
    in_transaction: bool,
    pub starts: usize,
    pub repeated_starts: usize,
    pub stops: usize,
    pub ops: Vec<LineOp>,
    pub events: Vec<BusEvent>,
    pub target: T,
}

impl<T: Target> SimBus<T> {
    pub fn new(target: T) -> Self {
        Self {
            master_scl_low: false,
            master_sda_low: false,
            slave_sda_low: false,
            stretch_remaining: 0,
            stretch_per_clock: 0,
            hold_scl: false,
            hold_sda: false,
            stuck_sda_clocks: 0,
            scl: true,
            sda: true,
            phase: Phase::Idle,
            in_transaction: false,
            starts: 0,
            repeated_starts: 0,
            stops: 0,
            ops: Vec::new(),
            events: Vec::new(),
            target,
        }
    }

    pub fn scl_level(&self) -> bool {
        !(self.master_scl_low || self.stretch_remaining > 0 || self.hold_scl)
    }

    pub fn sda_level(&self) -> bool {
        !(self.master_sda_low || self.slave_sda_low || self.hold_sda || self.stuck_sda_clocks > 0)
    }

    /// Forget recorded line operations and events, keeping counters
    pub fn clear_log(&mut self) {
        self.ops.clear();
        self.events.clear();
    }

    fn master_op(&mut self, op: LineOp) {
        match op {
            LineOp::ReleaseScl => {
                if self.master_scl_low && self.stretch_per_clock > 0 {
                    self.stretch_remaining = self.stretch_per_clock;
                }
                self.master_scl_low = false;
            }
            LineOp::PullScl => self.master_scl_low = true,
            LineOp::ReleaseSda => self.master_sda_low = false,
            LineOp::PullSda => self.master_sda_low = true,
        }
        self.ops.push(op);
        self.update();
    }

    fn sample_scl(&mut self) -> bool {
        if self.stretch_remaining > 0 {
            self.stretch_remaining -= 1;
            self.update();
        }
        self.scl_level()
    }

    fn sample_sda(&mut self) -> bool {
        self.update();
        self.sda_level()
    }

    fn update(&mut self) {
        let scl = self.scl_level();
        let sda = self.sda_level();

        if scl != self.scl {
            self.scl = scl;
            self.sda = sda;
            if scl {
                self.events.push(BusEvent::SclRise);
                self.on_scl_rise(sda);
            } else {
                self.events.push(BusEvent::SclFall);
                self.on_scl_fall();
            }
        } else if sda != self.sda {
            self.sda = sda;
            if scl {
                if sda {
                    self.on_stop();
                } else {
                    self.on_start();
                }
            }
        }

        // Slave reactions only move SDA while SCL is low
        self.sda = self.sda_level();
    }

    fn on_start(&mut self) {
        if self.in_transaction {
            self.repeated_starts += 1;
            self.events.push(BusEvent::RepeatedStart);
        } else {
            self.events.push(BusEvent::Start);
        }
        self.starts += 1;
        self.in_transaction = true;
        self.slave_sda_low = false;
        self.phase = Phase::Receive {
            bits: 0,
            shift: 0,
            address: true,
        };
        self.target.start();
    }

    fn on_stop(&mut self) {
        self.events.push(BusEvent::Stop);
        if self.in_transaction {
            self.stops += 1;
            self.target.stop();
        }
        self.in_transaction = false;
        self.slave_sda_low = false;
        self.phase = Phase::Idle;
    }

    fn on_scl_rise(&mut self, sda: bool) {
        match &mut self.phase {
            Phase::Receive { bits, shift, .. } if *bits < 8 => {
                *shift = (*shift << 1) | sda as u8;
                *bits += 1;
            }
            Phase::MasterAck { acked } => *acked = !sda,
            _ => {}
        }
    }

    fn on_scl_fall(&mut self) {
        self.stuck_sda_clocks = self.stuck_sda_clocks.saturating_sub(1);

        match self.phase {
            Phase::Receive {
                bits: 8,
                shift,
                address,
            } => {
                let (ack, then) = if address {
                    let read = shift & 1 != 0;
                    if self.target.address_matches(shift >> 1) {
                        (true, if read { After::Transmit } else { After::Receive })
                    } else {
                        (false, After::Ignore)
                    }
                } else if self.target.write(shift) {
                    (true, After::Receive)
                } else {
                    (false, After::Ignore)
                };
                self.slave_sda_low = ack;
                self.phase = Phase::SlaveAck { then };
            }
            Phase::SlaveAck { then } => {
                self.slave_sda_low = false;
                self.phase = match then {
                    After::Receive => Phase::Receive {
                        bits: 0,
                        shift: 0,
                        address: false,
                    },
                    After::Transmit => self.load_byte(),
                    After::Ignore => Phase::Idle,
                };
            }
            Phase::Transmit { bits, byte } => {
                let bits = bits + 1;
                if bits == 8 {
                    self.slave_sda_low = false;
                    self.phase = Phase::MasterAck { acked: false };
                } else {
                    self.slave_sda_low = (byte << bits) & 0x80 == 0;
                    self.phase = Phase::Transmit { bits, byte };
                }
            }
            Phase::MasterAck { acked: true } => self.phase = self.load_byte(),
            Phase::MasterAck { acked: false } => self.phase = Phase::Idle,
            _ => {}
        }
    }

    fn load_byte(&mut self) -> Phase {
        let byte = self.target.read();
        self.slave_sda_low = byte & 0x80 == 0;
        Phase::Transmit { bits: 0, byte }
    }
}

#[derive(Debug, Clone, Copy)]
enum Wire {
    Scl,
    Sda,
}

/// One master-side line of a [`SimBus`]
pub struct SimLine<T> {
    bus: Rc<RefCell<SimBus<T>>>,
    wire: Wire,
}

impl<T: Target> OpenDrainLine for SimLine<T> {
    fn is_high(&mut self) -> bool {
        let mut bus = self.bus.borrow_mut();
        match self.wire {
            Wire::Scl => bus.sample_scl(),
            Wire::Sda => bus.sample_sda(),
        }
    }

    fn release(&mut self) {
        let op = match self.wire {
            Wire::Scl => LineOp::ReleaseScl,
            Wire::Sda => LineOp::ReleaseSda,
        };
        self.bus.borrow_mut().master_op(op);
    }

    fn pull_low(&mut self) {
        let op = match self.wire {
            Wire::Scl => LineOp::PullScl,
            Wire::Sda => LineOp::PullSda,
        };
        self.bus.borrow_mut().master_op(op);
    }
}

/// Clock that advances 1 µs every time it is read
#[derive(Clone)]
pub struct StepClock {
    now: Rc<Cell<u64>>,
}

impl Monotonic for StepClock {
    fn now_micros(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + 1);
        now
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Bus master wired to a simulated bus
pub type SimI2c<T> = SoftI2c<SimLine<T>, SimLine<T>, NoDelay, StepClock>;

/// Build a master on a fresh simulated bus with `target` attached
///
/// Returns the master, the shared bus for inspection and fault injection,
/// and the clock counter.
pub fn sim_bus<T: Target>(target: T) -> (SimI2c<T>, Rc<RefCell<SimBus<T>>>, Rc<Cell<u64>>) {
    let bus = Rc::new(RefCell::new(SimBus::new(target)));
    let now = Rc::new(Cell::new(0));

    let scl = SimLine {
        bus: bus.clone(),
        wire: Wire::Scl,
    };
    let sda = SimLine {
        bus: bus.clone(),
        wire: Wire::Sda,
    };
    let clock = StepClock { now: now.clone() };

    let master = SoftI2c::new(scl, sda, NoDelay, clock, I2cConfig::default());
    (master, bus, now)
}

/// Plain memory-like target
pub struct MemoryTarget {
    pub address: u8,
    pub written: Vec<u8>,
    pub to_read: VecDeque<u8>,
    pub reads: usize,
    /// Number of data bytes to ACK before refusing
    pub accept_writes: usize,
}

impl MemoryTarget {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            written: Vec::new(),
            to_read: VecDeque::new(),
            reads: 0,
            accept_writes: usize::MAX,
        }
    }
}

impl Target for MemoryTarget {
    fn address_matches(&mut self, address: u8) -> bool {
        address == self.address
    }

    fn write(&mut self, byte: u8) -> bool {
        if self.written.len() >= self.accept_writes {
            return false;
        }
        self.written.push(byte);
        true
    }

    fn read(&mut self) -> u8 {
        self.reads += 1;
        self.to_read.pop_front().unwrap_or(0xFF)
    }
}
