//! One transaction per address

use capio_hal::{Address, Bits, FixedBitSet, HalError, HalResult, LevelMap};

use super::{DispatchStrategy, Drive};
use crate::bus::RegisterBus;
use crate::layout::{lookup, PinLayout, LAYOUT, PIN_COUNT};

/// Decode each address and write its bit on its own
///
/// Writes go out in ascending address order, so bank 0 comes before bank 1
/// and a repeated address is written once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exhaustive;

impl DispatchStrategy for Exhaustive {
    fn drive<B: RegisterBus>(
        bus: &B,
        drive: Drive,
        addresses: impl Iterator<Item = Address>,
    ) -> HalResult<()> {
        let mut pending = FixedBitSet::<PIN_COUNT>::new();
        for address in addresses {
            lookup(address)?;
            pending.put(address as usize, true);
        }

        for (address, pin) in LAYOUT.iter().enumerate() {
            if pending.test(address) {
                let field = drive.field(pin);
                bus.write(field.offset, field.insert(0, 1));
            }
        }
        Ok(())
    }

    fn level<B: RegisterBus>(bus: &B, pin: &PinLayout) -> HalResult<bool> {
        Ok(pin.level.extract(bus.read(pin.level.offset)) != 0)
    }

    fn sample<B: RegisterBus>(bus: &B, addresses: &[Address], levels: &mut LevelMap) -> HalResult<()> {
        for &address in addresses {
            let level = Self::level(bus, lookup(address)?)?;
            levels
                .insert(address, level)
                .map_err(|_| HalError::Unsupported("too many addresses in one batch"))?;
        }
        Ok(())
    }
}
