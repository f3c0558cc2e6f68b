//! Register map
//!
//! Byte offsets from the peripheral block base and field encodings, as
//! laid out in the BCM2711 ARM Peripherals manual.

/// GPIO controller, relative to the peripheral base
pub const GPIO_BLOCK: usize = 0x20_0000;

/// System timer, relative to the peripheral base
pub const SYSTEM_TIMER_BLOCK: usize = 0x3000;

// GPIO controller

/// Function select 0..=5, 3 bits per pin
pub const GPFSEL0: usize = 0x00;
pub const GPFSEL_COUNT: usize = 6;

/// Output set 0..=1, write 1 to drive high
pub const GPSET0: usize = 0x1c;
/// Output clear 0..=1, write 1 to drive low
pub const GPCLR0: usize = 0x28;
/// Pin level 0..=1, read only
pub const GPLEV0: usize = 0x34;

/// Pull-up / pull-down control 0..=3, 2 bits per pin
pub const GPIO_PUP_PDN_CNTRL_REG0: usize = 0xe4;
pub const GPIO_PUP_PDN_CNTRL_COUNT: usize = 4;

pub const FSEL_INPUT: u32 = 0b000;
pub const FSEL_OUTPUT: u32 = 0b001;

pub const PULL_NONE: u32 = 0b00;
pub const PULL_UP: u32 = 0b01;
pub const PULL_DOWN: u32 = 0b10;

// System timer

/// Counter lower 32 bits
pub const ST_CLO: usize = 0x04;
/// Counter upper 32 bits
pub const ST_CHI: usize = 0x08;

/// Free-running counter rate
pub const SYSTEM_TIMER_HZ: u32 = 1_000_000;

/// Offset of the `index`th 32-bit register in a bank starting at `first`
pub const fn bank(first: usize, index: usize) -> usize {
    first + index * 4
}
