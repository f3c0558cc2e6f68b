//! One transaction per touched register

use capio_hal::{Address, BitSet, Bits, FixedBitSet, HalError, HalResult, LevelMap};

use super::{DispatchStrategy, Drive};
use crate::bus::RegisterBus;
use crate::layout::{lookup, PinLayout, BANK0_PINS, BANK1_PINS};
use crate::regs::{bank, GPLEV0};

/// Assemble each register's bits first, then write them in one go
///
/// Bank 0 is written before bank 1; untouched banks are not written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Batched;

impl DispatchStrategy for Batched {
    fn drive<B: RegisterBus>(
        bus: &B,
        drive: Drive,
        addresses: impl Iterator<Item = Address>,
    ) -> HalResult<()> {
        let mut bank0 = FixedBitSet::<BANK0_PINS>::new();
        let mut bank1 = FixedBitSet::<BANK1_PINS>::new();

        for address in addresses {
            let pin = lookup(address)?;
            match pin.bank() {
                0 => bank0.set(pin.bit(), true)?,
                _ => bank1.set(pin.bit(), true)?,
            }
        }

        if bank0.any() {
            bus.write(bank(drive.first(), 0), bank0.raw() as u32);
        }
        if bank1.any() {
            bus.write(bank(drive.first(), 1), bank1.raw() as u32);
        }
        Ok(())
    }

    fn level<B: RegisterBus>(bus: &B, pin: &PinLayout) -> HalResult<bool> {
        let levels = BitSet::<u32>::from(bus.read(pin.level.offset));
        Ok(levels.get(pin.bit())?)
    }

    fn sample<B: RegisterBus>(bus: &B, addresses: &[Address], levels: &mut LevelMap) -> HalResult<()> {
        let mut banks: [Option<BitSet<u32>>; 2] = [None, None];

        for &address in addresses {
            let pin = lookup(address)?;
            let register = match banks[pin.bank()] {
                Some(register) => register,
                None => {
                    let register = BitSet::from(bus.read(bank(GPLEV0, pin.bank())));
                    banks[pin.bank()] = Some(register);
                    register
                }
            };
            levels
                .insert(address, register.get(pin.bit())?)
                .map_err(|_| HalError::Unsupported("too many addresses in one batch"))?;
        }
        Ok(())
    }
}
