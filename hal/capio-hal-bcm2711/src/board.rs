//! Raspberry Pi 4B device handle

use capio_hal::{
    Address, AsyncIoCapable, ClockCapable, Device, HalResult, IoCapable, LevelMap, PinMode,
    PinPullState, PolledEdges, PolledLevels,
};

use crate::bus::{Mmio, RegisterBus};
use crate::config::BoardConfig;
use crate::dispatch::{DefaultStrategy, DispatchStrategy};
use crate::gpio::Gpio;
use crate::regs::SYSTEM_TIMER_HZ;
use crate::timer::SystemTimer;

/// The board: GPIO controller plus system timer
///
/// Implements [`IoCapable`], [`AsyncIoCapable`] and [`ClockCapable`] by
/// delegating to its parts.
pub struct RaspberryPi4b<G, T, S = DefaultStrategy> {
    gpio: Gpio<G, S>,
    timer: SystemTimer<T>,
}

impl RaspberryPi4b<Mmio, Mmio> {
    /// Map both blocks at the addresses given by `config`
    ///
    /// # Safety
    ///
    /// The peripheral window described by `config` must be mapped and
    /// accessible, and this must be the only handle driving the GPIO
    /// controller and the system timer.
    #[allow(unsafe_code)]
    pub unsafe fn from_config(config: BoardConfig) -> Self {
        #[cfg(feature = "defmt")]
        defmt::debug!("raspberry pi 4b: peripherals at {=usize:x}", config.peripheral_base);
        Self::new(
            Gpio::new(Mmio::new(config.gpio_base())),
            SystemTimer::new(Mmio::new(config.system_timer_base())),
        )
    }
}

impl<G: RegisterBus, T: RegisterBus, S: DispatchStrategy> RaspberryPi4b<G, T, S> {
    pub fn new(gpio: Gpio<G, S>, timer: SystemTimer<T>) -> Self {
        Self { gpio, timer }
    }

    pub fn gpio(&self) -> &Gpio<G, S> {
        &self.gpio
    }

    pub fn timer(&self) -> &SystemTimer<T> {
        &self.timer
    }

    /// Mutable timer access, for blocking delays
    pub fn timer_mut(&mut self) -> &mut SystemTimer<T> {
        &mut self.timer
    }

    pub fn into_parts(self) -> (Gpio<G, S>, SystemTimer<T>) {
        (self.gpio, self.timer)
    }
}

impl<G, T, S> Device for RaspberryPi4b<G, T, S> {
    fn id(&self) -> &'static str {
        "raspberry-pi-4b"
    }
}

impl<G: RegisterBus, T: RegisterBus, S: DispatchStrategy> IoCapable for RaspberryPi4b<G, T, S> {
    fn read(&self, address: Address) -> HalResult<bool> {
        self.gpio.read(address)
    }

    fn write(&self, address: Address, value: bool) -> HalResult<()> {
        self.gpio.write(address, value)
    }

    fn configure(&self, address: Address, mode: PinMode, pull: PinPullState) -> HalResult<()> {
        self.gpio.configure(address, mode, pull)
    }

    fn reset_io(&self, address: Address) -> HalResult<()> {
        self.gpio.reset_io(address)
    }

    fn read_all(&self, addresses: &[Address]) -> HalResult<LevelMap> {
        self.gpio.read_all(addresses)
    }

    fn write_all(&self, levels: &LevelMap) -> HalResult<()> {
        self.gpio.write_all(levels)
    }
}

impl<G: RegisterBus, T: RegisterBus, S: DispatchStrategy> AsyncIoCapable
    for RaspberryPi4b<G, T, S>
{
    type LevelStream<'a> = PolledLevels<'a, Self> where Self: 'a;
    type EdgeStream<'a> = PolledEdges<'a, Self> where Self: 'a;

    fn pin_level_state(&self, address: Address) -> HalResult<Self::LevelStream<'_>> {
        PolledLevels::new(self, address)
    }

    fn pin_edge_state(&self, address: Address) -> HalResult<Self::EdgeStream<'_>> {
        PolledEdges::new(self, address)
    }
}

impl<G: RegisterBus, T: RegisterBus, S: DispatchStrategy> ClockCapable for RaspberryPi4b<G, T, S> {
    const FREQUENCY_HZ: u32 = SYSTEM_TIMER_HZ;

    fn ticks(&self) -> HalResult<u64> {
        self.timer.ticks()
    }
}
