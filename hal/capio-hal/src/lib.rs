//! Capio Hardware Abstraction Layer
//!
//! This crate defines the capability contracts, typed pin handles and bit
//! set storage that chip-specific backends build on. Application code is
//! written against the capability traits and runs on any backend that
//! implements them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!          │ Pin / PinSet            │ ClockCapable
//!          ▼                         │
//! ┌─────────────────────────────────────────┐
//! │  capio-hal (this crate - contracts)     │
//! │  IoCapable  AsyncIoCapable  BitSet      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ capio-hal-bcm2711 │
//!           └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`bitset`] - [`BitSet`] and [`FixedBitSet`] bit-indexed storage
//! - [`capability`] - [`IoCapable`], [`AsyncIoCapable`], [`ClockCapable`]
//!   and reserved peripheral families
//! - [`Pin`], [`PinSet`] - mode-checked handles over an [`IoCapable`] backend
//! - [`error`] - [`HalError`], [`PinError`], [`BitSetError`]
//!
//! # Example
//!
//! ```ignore
//! let led = board.pin(42, PinMode::Output, PinPullState::None)?;
//! led.on()?;
//!
//! board.with_pinset(&[(20, PinConfig::input()), (21, PinConfig::output())], |set| {
//!     set.on()?;
//!     let levels = set.values()?; // [Some(level_20), None]
//!     Ok::<_, PinError>(levels)
//! })?;
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bitset;
pub mod capability;
pub mod device;
pub mod error;
pub mod pin;
pub mod pinset;

#[cfg(test)]
mod mock;

// Re-export key types at crate root for convenience
pub use bitset::{BitSet, Bits, FixedBitSet, Word};
pub use capability::{
    AsyncIoCapable, ClockCapable, EventStream, IoCapable, LevelMap, PinConfig, PinEdgeState,
    PinLevelState, PinMode, PinPullState, PolledEdges, PolledLevels, MAX_PINS,
};
pub use device::{Address, Device};
pub use error::{BitSetError, HalError, HalResult, PinError};
pub use pin::{IoBase, Pin};
pub use pinset::PinSet;
