//! Board configuration

use crate::regs::{GPIO_BLOCK, SYSTEM_TIMER_BLOCK};

/// Where the peripheral blocks live in the ARM physical address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Base of the main peripheral window
    pub peripheral_base: usize,
}

impl BoardConfig {
    /// Low peripheral mode, the firmware default
    pub const LOW_PERIPHERAL: Self = Self {
        peripheral_base: 0xFE00_0000,
    };

    /// Full 35-bit address map
    #[cfg(target_pointer_width = "64")]
    pub const FULL_35BIT: Self = Self {
        peripheral_base: 0x4_7E00_0000,
    };

    pub const fn new(peripheral_base: usize) -> Self {
        Self { peripheral_base }
    }

    pub const fn gpio_base(&self) -> usize {
        self.peripheral_base + GPIO_BLOCK
    }

    pub const fn system_timer_base(&self) -> usize {
        self.peripheral_base + SYSTEM_TIMER_BLOCK
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::LOW_PERIPHERAL
    }
}
