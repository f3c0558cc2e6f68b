//! Set/clear/level dispatch strategies
//!
//! Two ways to turn a batch of logical addresses into register traffic:
//!
//! - [`Exhaustive`] decodes each address and touches its own bit with a
//!   dedicated bus transaction.
//! - [`Batched`] collects the addresses of each destination register into
//!   a [`FixedBitSet`](capio_hal::FixedBitSet) and issues one transaction
//!   per touched register.
//!
//! Both leave identical register state behind for identical input.
//! [`DefaultStrategy`] is picked at build time by the `bitset-dispatch`
//! feature; either strategy can also be named explicitly.
//!
//! Strategies assume their addresses were validated by the caller, but
//! still propagate a decode failure rather than touch a wrong register.

mod batched;
mod exhaustive;

pub use batched::Batched;
pub use exhaustive::Exhaustive;

use capio_hal::{Address, HalResult, LevelMap};

use crate::bus::RegisterBus;
use crate::layout::{Field, PinLayout};
use crate::regs::{GPCLR0, GPSET0};

/// Strategy used by [`Gpio`](crate::Gpio) when none is named
#[cfg(feature = "bitset-dispatch")]
pub type DefaultStrategy = Batched;

/// Strategy used by [`Gpio`](crate::Gpio) when none is named
#[cfg(not(feature = "bitset-dispatch"))]
pub type DefaultStrategy = Exhaustive;

/// Which write-1-to-act register family a batch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    /// GPSETn, drive high
    Set,
    /// GPCLRn, drive low
    Clear,
}

impl Drive {
    pub fn from_level(level: bool) -> Self {
        if level {
            Drive::Set
        } else {
            Drive::Clear
        }
    }

    /// Offset of the family's first register
    pub const fn first(self) -> usize {
        match self {
            Drive::Set => GPSET0,
            Drive::Clear => GPCLR0,
        }
    }

    /// The pin's bit in this family
    pub const fn field(self, pin: &PinLayout) -> Field {
        match self {
            Drive::Set => pin.set,
            Drive::Clear => pin.clear,
        }
    }
}

/// Register traffic for level reads and set/clear writes
pub trait DispatchStrategy {
    /// Act on every address in `addresses` through the `drive` family
    fn drive<B: RegisterBus>(
        bus: &B,
        drive: Drive,
        addresses: impl Iterator<Item = Address>,
    ) -> HalResult<()>;

    /// Current level of one pin
    fn level<B: RegisterBus>(bus: &B, pin: &PinLayout) -> HalResult<bool>;

    /// Record the level of every address in `addresses` into `levels`
    fn sample<B: RegisterBus>(bus: &B, addresses: &[Address], levels: &mut LevelMap) -> HalResult<()>;
}
