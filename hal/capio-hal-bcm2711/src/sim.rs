//! In-memory register blocks
//!
//! Host-side stand-ins for the GPIO controller and the system timer. They
//! model just enough of the hardware for the backend to be exercised
//! without a board: write-1-to-set/clear output latches, level readback
//! that follows the function select, and a counter that advances while it
//! is being read. Every bus transaction is counted and GPIO writes are
//! logged in order.

use core::array;
use core::cell::{Cell, RefCell};

use capio_hal::Address;
use heapless::Vec;

use crate::bus::RegisterBus;
use crate::layout::{LAYOUT, PIN_COUNT};
use crate::regs::{bank, FSEL_OUTPUT, GPCLR0, GPLEV0, GPSET0, ST_CHI, ST_CLO};

/// Register words backing offsets `0x00..0x100`
const WORDS: usize = 64;

/// Writes kept in the log; later writes are still applied but not logged
pub const LOG_CAPACITY: usize = 256;

/// Simulated GPIO controller
pub struct SimGpio {
    registers: [Cell<u32>; WORDS],
    latch: [Cell<u32>; 2],
    inputs: [Cell<u32>; 2],
    log: RefCell<Vec<(usize, u32), LOG_CAPACITY>>,
    reads: Cell<usize>,
}

impl SimGpio {
    /// All pins floating inputs, all levels low
    pub fn new() -> Self {
        Self {
            registers: array::from_fn(|_| Cell::new(0)),
            latch: array::from_fn(|_| Cell::new(0)),
            inputs: array::from_fn(|_| Cell::new(0)),
            log: RefCell::new(Vec::new()),
            reads: Cell::new(0),
        }
    }

    /// Apply an external level to `address`, seen while it is not an output
    pub fn drive_input(&self, address: Address, level: bool) {
        if let Some(pin) = LAYOUT.get(address as usize) {
            let bits = &self.inputs[pin.bank()];
            let mask = 1 << pin.bit();
            bits.set(if level { bits.get() | mask } else { bits.get() & !mask });
        }
    }

    /// Output latch of `address`
    pub fn latched(&self, address: Address) -> bool {
        LAYOUT
            .get(address as usize)
            .is_some_and(|pin| self.latch[pin.bank()].get() & (1 << pin.bit()) != 0)
    }

    /// Stored register value, without counting a bus read
    ///
    /// Set and clear registers read as zero; level registers read as the
    /// composed pin levels.
    pub fn register(&self, offset: usize) -> u32 {
        match offset {
            o if o == GPSET0 || o == bank(GPSET0, 1) => 0,
            o if o == GPCLR0 || o == bank(GPCLR0, 1) => 0,
            o if o == GPLEV0 => self.levels(0),
            o if o == bank(GPLEV0, 1) => self.levels(1),
            _ => self.registers.get(offset / 4).map_or(0, Cell::get),
        }
    }

    /// Logged writes as `(offset, value)`, oldest first
    pub fn writes(&self) -> Vec<(usize, u32), LOG_CAPACITY> {
        self.log.borrow().clone()
    }

    /// Bus reads so far
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
        self.reads.set(0);
    }

    fn levels(&self, bank: usize) -> u32 {
        let first = bank * 32;
        let last = PIN_COUNT.min(first + 32);
        (first..last).fold(0, |acc, address| {
            let pin = &LAYOUT[address];
            let select = pin.select.extract(self.registers[pin.select.offset / 4].get());
            let source = if select == FSEL_OUTPUT {
                &self.latch[bank]
            } else {
                &self.inputs[bank]
            };
            acc | (source.get() & (1 << pin.bit()))
        })
    }
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimGpio {
    fn read(&self, offset: usize) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.register(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        // a full log only stops recording
        let _ = self.log.borrow_mut().push((offset, value));

        let set = [GPSET0, bank(GPSET0, 1)];
        let clear = [GPCLR0, bank(GPCLR0, 1)];
        let level = [GPLEV0, bank(GPLEV0, 1)];

        if let Some(n) = set.iter().position(|&o| o == offset) {
            self.latch[n].set(self.latch[n].get() | value);
        } else if let Some(n) = clear.iter().position(|&o| o == offset) {
            self.latch[n].set(self.latch[n].get() & !value);
        } else if level.contains(&offset) {
            // read only
        } else if let Some(register) = self.registers.get(offset / 4) {
            register.set(value);
        }
    }
}

/// Simulated system timer
///
/// Each read of the low counter word advances the counter by `step`.
pub struct SimTimer {
    now: Cell<u64>,
    step: u64,
    reads: Cell<usize>,
}

impl SimTimer {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            now: Cell::new(start),
            step,
            reads: Cell::new(0),
        }
    }

    /// Current counter value, without advancing it
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    /// Bus reads so far
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl RegisterBus for SimTimer {
    fn read(&self, offset: usize) -> u32 {
        self.reads.set(self.reads.get() + 1);
        let now = self.now.get();
        match offset {
            ST_CHI => (now >> 32) as u32,
            ST_CLO => {
                self.now.set(now.wrapping_add(self.step));
                now as u32
            }
            _ => 0,
        }
    }

    fn write(&self, _offset: usize, _value: u32) {}
}
