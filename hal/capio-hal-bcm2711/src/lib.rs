//! BCM2711 backend for capio-hal
//!
//! Binds logical pin addresses `0..=57` to the GPIO controller registers of
//! the Raspberry Pi 4B and exposes its 1 MHz system timer as a clock.
//!
//! - [`Gpio`] - `IoCapable` / `AsyncIoCapable` over the GPIO register block
//! - [`SystemTimer`] - `ClockCapable` and `embedded_hal::delay::DelayNs`
//! - [`RaspberryPi4b`] - both of the above behind one device handle
//! - [`layout`] - compile-time address to bitfield table
//! - [`dispatch`] - exhaustive and bitset-batched register dispatch
//! - [`bus`] - volatile MMIO and the [`RegisterBus`] seam
//! - `sim` - in-memory register blocks for host tests
//!
//! # Features
//!
//! - `bitset-dispatch` (default) - [`Batched`] is the default strategy;
//!   otherwise [`Exhaustive`]
//! - `defmt` - log through `defmt`
//! - `sim` - build the `sim` module and its `SimGpio` / `SimTimer`

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod bus;
pub mod config;
pub mod dispatch;
pub mod gpio;
pub mod layout;
pub mod regs;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod timer;

pub use board::RaspberryPi4b;
pub use bus::{Mmio, RegisterBus};
pub use config::BoardConfig;
pub use dispatch::{Batched, DefaultStrategy, DispatchStrategy, Drive, Exhaustive};
pub use gpio::Gpio;
pub use layout::PIN_COUNT;
#[cfg(any(test, feature = "sim"))]
pub use sim::{SimGpio, SimTimer};
pub use timer::SystemTimer;
