//! Capability contracts
//!
//! A backend opts into each capability separately by implementing its
//! trait on top of [`Device`](crate::Device). Capabilities are additive:
//! a board can be [`IoCapable`] and [`ClockCapable`] without either trait
//! knowing about the other.
//!
//! The marker traits at the bottom of this module reserve names for
//! peripheral families that have no operations defined yet.

mod async_io;
mod clock;
mod io;

pub use async_io::{
    AsyncIoCapable, EventStream, PinEdgeState, PinLevelState, PolledEdges, PolledLevels,
};
pub use clock::ClockCapable;
pub use io::IoCapable;

use heapless::FnvIndexMap;

use crate::device::{Address, Device};

/// Upper bound on pins handled by one batch call or one [`PinSet`](crate::PinSet)
pub const MAX_PINS: usize = 64;

/// Address to level map used by batch reads and writes
pub type LevelMap = FnvIndexMap<Address, bool, MAX_PINS>;

/// Direction a pin is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinMode {
    Input,
    Output,
    /// Readable and drivable at the same time, where the hardware allows it
    InputOutput,
}

impl PinMode {
    /// Mode permits reading the pin level
    pub fn is_input(self) -> bool {
        !matches!(self, PinMode::Output)
    }

    /// Mode permits driving the pin
    pub fn is_output(self) -> bool {
        !matches!(self, PinMode::Input)
    }
}

/// Internal resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinPullState {
    /// Floating
    #[default]
    None,
    PullUp,
    PullDown,
}

/// Mode and pull for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinConfig {
    pub mode: PinMode,
    pub pull: PinPullState,
}

impl PinConfig {
    pub const fn new(mode: PinMode, pull: PinPullState) -> Self {
        Self { mode, pull }
    }

    /// Input with no pull
    pub const fn input() -> Self {
        Self::new(PinMode::Input, PinPullState::None)
    }

    /// Output with no pull
    pub const fn output() -> Self {
        Self::new(PinMode::Output, PinPullState::None)
    }
}

impl From<PinMode> for PinConfig {
    fn from(mode: PinMode) -> Self {
        Self::new(mode, PinPullState::None)
    }
}

// Reserved capability families

pub trait AdcCapable: IoCapable {}

pub trait DacCapable: IoCapable {}

pub trait I2cCapable: IoCapable {}

pub trait UartCapable: Device {}

pub trait PwmCapable: Device {}

pub trait SpiCapable: Device {}

pub trait UsbCapable: Device {}

pub trait TimerCapable: Device {}

pub trait GpuAugmentable: Device {}

pub trait NetworkCapable: Device {}

pub trait BluetoothCapable: NetworkCapable {}

pub trait WirelessCapable: NetworkCapable {}

pub trait EthernetCapable: NetworkCapable {}

/// Battery and supply monitoring
pub trait PowerManageable: NetworkCapable {}
