//! In-memory backend for unit tests

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use heapless::FnvIndexMap;

use crate::capability::{
    AsyncIoCapable, IoCapable, LevelMap, PinConfig, PinMode, PinPullState, PolledEdges,
    PolledLevels, MAX_PINS,
};
use crate::device::{Address, Device};
use crate::error::{HalError, HalResult};

pub(crate) const PIN_COUNT: usize = 58;

/// Pin levels shared between "hardware" and test code; every pin can be
/// read and driven regardless of configuration
pub(crate) struct MockIo {
    levels: RefCell<[bool; PIN_COUNT]>,
    configs: RefCell<FnvIndexMap<Address, PinConfig, MAX_PINS>>,
    resets: RefCell<Vec<Address>>,
    last_batch: RefCell<Vec<(Address, bool)>>,
    pending: Cell<Option<(Address, bool, usize)>>,
    writes: Cell<usize>,
    batch_reads: Cell<usize>,
    configures: Cell<usize>,
    fail_configure: Cell<Option<Address>>,
    fail_reset: Cell<bool>,
}

impl MockIo {
    pub(crate) fn new() -> Self {
        Self {
            levels: RefCell::new([false; PIN_COUNT]),
            configs: RefCell::new(FnvIndexMap::new()),
            resets: RefCell::new(Vec::new()),
            last_batch: RefCell::new(Vec::new()),
            pending: Cell::new(None),
            writes: Cell::new(0),
            batch_reads: Cell::new(0),
            configures: Cell::new(0),
            fail_configure: Cell::new(None),
            fail_reset: Cell::new(false),
        }
    }

    /// Set a level from outside
    pub(crate) fn drive(&self, address: Address, level: bool) {
        self.levels.borrow_mut()[address as usize] = level;
    }

    /// Set a level once `reads` more single reads have happened
    pub(crate) fn drive_after_reads(&self, address: Address, level: bool, reads: usize) {
        self.pending.set(Some((address, level, reads)));
    }

    pub(crate) fn level(&self, address: Address) -> bool {
        self.levels.borrow()[address as usize]
    }

    pub(crate) fn config(&self, address: Address) -> Option<PinConfig> {
        self.configs.borrow().get(&address).copied()
    }

    pub(crate) fn resets(&self) -> Vec<Address> {
        self.resets.borrow().clone()
    }

    pub(crate) fn last_batch(&self) -> Vec<(Address, bool)> {
        self.last_batch.borrow().clone()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.get()
    }

    pub(crate) fn batch_reads(&self) -> usize {
        self.batch_reads.get()
    }

    pub(crate) fn configures(&self) -> usize {
        self.configures.get()
    }

    pub(crate) fn fail_configure(&self, address: Address) {
        self.fail_configure.set(Some(address));
    }

    pub(crate) fn fail_reset(&self, fail: bool) {
        self.fail_reset.set(fail);
    }

    fn check(&self, address: Address) -> HalResult<usize> {
        if (address as usize) < PIN_COUNT {
            Ok(address as usize)
        } else {
            Err(HalError::UnknownAddress {
                message: "mock pin address out of range",
                address,
            })
        }
    }

    fn tick(&self) {
        if let Some((address, level, reads)) = self.pending.get() {
            if reads <= 1 {
                self.pending.set(None);
                self.drive(address, level);
            } else {
                self.pending.set(Some((address, level, reads - 1)));
            }
        }
    }
}

impl Device for MockIo {
    fn id(&self) -> &'static str {
        "mock-io"
    }
}

impl IoCapable for MockIo {
    fn read(&self, address: Address) -> HalResult<bool> {
        let index = self.check(address)?;
        self.tick();
        Ok(self.levels.borrow()[index])
    }

    fn write(&self, address: Address, value: bool) -> HalResult<()> {
        let index = self.check(address)?;
        self.writes.set(self.writes.get() + 1);
        self.levels.borrow_mut()[index] = value;
        Ok(())
    }

    fn configure(&self, address: Address, mode: PinMode, pull: PinPullState) -> HalResult<()> {
        self.check(address)?;
        if self.fail_configure.get() == Some(address) {
            return Err(HalError::Unsupported("configuration rejected"));
        }
        self.configures.set(self.configures.get() + 1);
        self.configs
            .borrow_mut()
            .insert(address, PinConfig::new(mode, pull))
            .map_err(|_| HalError::Unknown("mock config table full"))?;
        Ok(())
    }

    fn reset_io(&self, address: Address) -> HalResult<()> {
        self.check(address)?;
        self.resets.borrow_mut().push(address);
        if self.fail_reset.get() {
            return Err(HalError::Unknown("reset failed"));
        }
        self.configs.borrow_mut().remove(&address);
        Ok(())
    }

    fn read_all(&self, addresses: &[Address]) -> HalResult<LevelMap> {
        for &address in addresses {
            self.check(address)?;
        }
        self.batch_reads.set(self.batch_reads.get() + 1);
        let levels = self.levels.borrow();
        let mut map = LevelMap::new();
        for &address in addresses {
            map.insert(address, levels[address as usize])
                .map_err(|_| HalError::Unsupported("too many addresses"))?;
        }
        Ok(map)
    }

    fn write_all(&self, levels: &LevelMap) -> HalResult<()> {
        for &address in levels.keys() {
            self.check(address)?;
        }
        self.writes.set(self.writes.get() + 1);
        let mut batch = self.last_batch.borrow_mut();
        batch.clear();
        for (&address, &value) in levels {
            self.levels.borrow_mut()[address as usize] = value;
            batch.push((address, value));
        }
        Ok(())
    }
}

impl AsyncIoCapable for MockIo {
    type LevelStream<'a> = PolledLevels<'a, Self> where Self: 'a;
    type EdgeStream<'a> = PolledEdges<'a, Self> where Self: 'a;

    fn pin_level_state(&self, address: Address) -> HalResult<Self::LevelStream<'_>> {
        PolledLevels::new(self, address)
    }

    fn pin_edge_state(&self, address: Address) -> HalResult<Self::EdgeStream<'_>> {
        PolledEdges::new(self, address)
    }
}
