//! GPIO controller

use core::iter;
use core::marker::PhantomData;

use capio_hal::{
    Address, AsyncIoCapable, Device, HalError, HalResult, IoCapable, LevelMap, PinMode,
    PinPullState, PolledEdges, PolledLevels,
};

use crate::bus::RegisterBus;
use crate::dispatch::{DefaultStrategy, DispatchStrategy, Drive};
use crate::layout::{self, lookup};
use crate::regs::{FSEL_INPUT, FSEL_OUTPUT, PULL_DOWN, PULL_NONE, PULL_UP};

/// BCM2711 GPIO controller, addresses `0..=57`
///
/// Direction and pull changes are read-modify-write on the shared select
/// and pull registers. Level changes go through the write-1-to-act set and
/// clear registers and never disturb other pins.
pub struct Gpio<B, S = DefaultStrategy> {
    bus: B,
    _strategy: PhantomData<S>,
}

impl<B: RegisterBus> Gpio<B> {
    /// Controller using the build's default dispatch strategy
    pub fn new(bus: B) -> Self {
        Self::with_strategy(bus)
    }
}

impl<B: RegisterBus, S: DispatchStrategy> Gpio<B, S> {
    /// Controller using dispatch strategy `S`
    pub fn with_strategy(bus: B) -> Self {
        Self {
            bus,
            _strategy: PhantomData,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    fn select(&self, address: Address, code: u32, pull: u32) -> HalResult<()> {
        let pin = lookup(address)?;
        self.bus
            .modify(pin.select.offset, |value| pin.select.insert(value, code));
        self.bus
            .modify(pin.pull.offset, |value| pin.pull.insert(value, pull));
        Ok(())
    }
}

fn select_code(mode: PinMode) -> HalResult<u32> {
    match mode {
        PinMode::Input => Ok(FSEL_INPUT),
        PinMode::Output => Ok(FSEL_OUTPUT),
        PinMode::InputOutput => Err(HalError::Unsupported(
            "BCM2711 pins cannot be input and output at once",
        )),
    }
}

fn pull_code(pull: PinPullState) -> u32 {
    match pull {
        PinPullState::None => PULL_NONE,
        PinPullState::PullUp => PULL_UP,
        PinPullState::PullDown => PULL_DOWN,
    }
}

impl<B, S> Device for Gpio<B, S> {
    fn id(&self) -> &'static str {
        "bcm2711-gpio"
    }
}

impl<B: RegisterBus, S: DispatchStrategy> IoCapable for Gpio<B, S> {
    fn read(&self, address: Address) -> HalResult<bool> {
        S::level(&self.bus, lookup(address)?)
    }

    fn write(&self, address: Address, value: bool) -> HalResult<()> {
        lookup(address)?;
        S::drive(&self.bus, Drive::from_level(value), iter::once(address))
    }

    fn configure(&self, address: Address, mode: PinMode, pull: PinPullState) -> HalResult<()> {
        lookup(address)?;
        let code = select_code(mode)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("gpio {}: configure {} pull {}", address, mode, pull);
        self.select(address, code, pull_code(pull))
    }

    fn reset_io(&self, address: Address) -> HalResult<()> {
        #[cfg(feature = "defmt")]
        defmt::debug!("gpio {}: reset", address);
        self.select(address, FSEL_INPUT, PULL_NONE)
    }

    fn read_all(&self, addresses: &[Address]) -> HalResult<LevelMap> {
        layout::validate(addresses.iter().copied())?;
        let mut levels = LevelMap::new();
        S::sample(&self.bus, addresses, &mut levels)?;
        Ok(levels)
    }

    fn write_all(&self, levels: &LevelMap) -> HalResult<()> {
        layout::validate(levels.keys().copied())?;
        let high = levels.iter().filter(|(_, level)| **level).map(|(&address, _)| address);
        let low = levels.iter().filter(|(_, level)| !**level).map(|(&address, _)| address);
        S::drive(&self.bus, Drive::Set, high)?;
        S::drive(&self.bus, Drive::Clear, low)
    }
}

impl<B: RegisterBus, S: DispatchStrategy> AsyncIoCapable for Gpio<B, S> {
    type LevelStream<'a> = PolledLevels<'a, Self> where Self: 'a;
    type EdgeStream<'a> = PolledEdges<'a, Self> where Self: 'a;

    fn pin_level_state(&self, address: Address) -> HalResult<Self::LevelStream<'_>> {
        PolledLevels::new(self, address)
    }

    fn pin_edge_state(&self, address: Address) -> HalResult<Self::EdgeStream<'_>> {
        PolledEdges::new(self, address)
    }
}
