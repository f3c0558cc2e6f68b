//! Register access
//!
//! Every hardware access in this crate goes through [`RegisterBus`]: one
//! call is one 32-bit bus transaction at a byte offset from the block base.
//! [`Mmio`] talks to the real peripheral; the `sim` module provides in-memory
//! buses for host tests.

#![allow(unsafe_code)]

use core::marker::PhantomData;
use core::ptr::{read_volatile, write_volatile};

/// 32-bit register block
pub trait RegisterBus {
    /// Read the register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write the register at `offset`
    fn write(&self, offset: usize, value: u32);

    /// Read-modify-write
    ///
    /// Not atomic: two bus transactions. Callers serialize access per block.
    fn modify(&self, offset: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read(offset);
        self.write(offset, f(value));
    }
}

impl<B: RegisterBus> RegisterBus for &B {
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}

/// Volatile access to a memory-mapped register block
///
/// `Send` but not `Sync`: a handle can move to another core, but
/// [`RegisterBus::modify`] is not atomic, so it cannot be shared.
///
/// ```compile_fail
/// fn shared<T: Sync>() {}
/// shared::<capio_hal_bcm2711::Mmio>();
/// ```
///
/// ```compile_fail
/// fn shared<T: Sync>() {}
/// shared::<capio_hal_bcm2711::RaspberryPi4b<capio_hal_bcm2711::Mmio, capio_hal_bcm2711::Mmio>>();
/// ```
#[derive(Debug)]
pub struct Mmio {
    base: usize,
    _not_sync: PhantomData<*const ()>,
}

// SAFETY: the block is only reachable through this handle, which is !Sync
unsafe impl Send for Mmio {}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the mapped, 4-byte aligned address of the register
    /// block, valid for the lifetime of this value, and no other code may
    /// access the block without synchronizing with its owner.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base,
            _not_sync: PhantomData,
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    fn register(&self, offset: usize) -> *mut u32 {
        (self.base + offset) as *mut u32
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: base is a valid block address per `Mmio::new`
        unsafe { read_volatile(self.register(offset)) }
    }

    #[inline(always)]
    fn write(&self, offset: usize, value: u32) {
        // SAFETY: base is a valid block address per `Mmio::new`
        unsafe { write_volatile(self.register(offset), value) }
    }
}
