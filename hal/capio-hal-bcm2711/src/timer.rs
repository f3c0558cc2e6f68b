//! System timer

use capio_hal::{ClockCapable, Device, HalResult};
use embedded_hal::delay::DelayNs;

use crate::bus::RegisterBus;
use crate::regs::{ST_CHI, ST_CLO, SYSTEM_TIMER_HZ};

/// Free-running 64-bit, 1 MHz system timer
pub struct SystemTimer<B> {
    bus: B,
}

impl<B: RegisterBus> SystemTimer<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Current counter value
    ///
    /// The counter is split over two registers and keeps running while they
    /// are read. The high word is read on both sides of the low word and the
    /// triple is repeated until both high reads agree, so a carry between
    /// the two halves can never produce a torn value.
    pub fn counter(&self) -> u64 {
        loop {
            let high = self.bus.read(ST_CHI);
            let low = self.bus.read(ST_CLO);
            let check = self.bus.read(ST_CHI);
            if high == check {
                return (u64::from(high) << 32) | u64::from(low);
            }
            #[cfg(feature = "defmt")]
            defmt::trace!("system timer carry during read: {=u32:x} -> {=u32:x}", high, check);
        }
    }
}

impl<B> Device for SystemTimer<B> {
    fn id(&self) -> &'static str {
        "bcm2711-system-timer"
    }
}

impl<B: RegisterBus> ClockCapable for SystemTimer<B> {
    const FREQUENCY_HZ: u32 = SYSTEM_TIMER_HZ;

    fn ticks(&self) -> HalResult<u64> {
        Ok(self.counter())
    }
}

impl<B: RegisterBus> DelayNs for SystemTimer<B> {
    fn delay_ns(&mut self, ns: u32) {
        let ticks = u64::from(ns).div_ceil(1_000_000_000 / u64::from(SYSTEM_TIMER_HZ));
        let start = self.counter();
        while self.counter().wrapping_sub(start) < ticks {
            core::hint::spin_loop();
        }
    }

    fn delay_us(&mut self, us: u32) {
        let start = self.counter();
        while self.counter().wrapping_sub(start) < u64::from(us) {
            core::hint::spin_loop();
        }
    }
}
