//! Asynchronous pin observation

use core::future::Future;

use embassy_futures::yield_now;

use crate::capability::IoCapable;
use crate::device::Address;
use crate::error::HalResult;

/// Steady level reported by a level stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinLevelState {
    High,
    Low,
}

impl From<bool> for PinLevelState {
    fn from(level: bool) -> Self {
        if level {
            PinLevelState::High
        } else {
            PinLevelState::Low
        }
    }
}

/// Transition reported by an edge stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinEdgeState {
    Rise,
    Fall,
}

/// Unbounded, lazily produced sequence of pin events
///
/// Dropping a stream stops delivery and never touches hardware state.
pub trait EventStream {
    type Item;

    /// Wait for the next event
    fn next(&mut self) -> impl Future<Output = HalResult<Self::Item>>;
}

/// Watch pin levels and edges over time
///
/// How events are generated (interrupts, polling) and with what latency is
/// up to the backend. Only the ordering of events for one address is
/// guaranteed. Each call returns a new, independent stream.
pub trait AsyncIoCapable: IoCapable {
    type LevelStream<'a>: EventStream<Item = PinLevelState>
    where
        Self: 'a;

    type EdgeStream<'a>: EventStream<Item = PinEdgeState>
    where
        Self: 'a;

    /// Stream the level of `address`: the current level, then every change
    fn pin_level_state(&self, address: Address) -> HalResult<Self::LevelStream<'_>>;

    /// Stream rising and falling edges on `address`
    fn pin_edge_state(&self, address: Address) -> HalResult<Self::EdgeStream<'_>>;
}

/// Level stream that samples [`IoCapable::read`] and yields to the executor
/// between samples
pub struct PolledLevels<'a, H: IoCapable + ?Sized> {
    hal: &'a H,
    address: Address,
    last: Option<bool>,
}

impl<'a, H: IoCapable + ?Sized> PolledLevels<'a, H> {
    /// Fails if `address` cannot be read
    pub fn new(hal: &'a H, address: Address) -> HalResult<Self> {
        hal.read(address)?;
        Ok(Self {
            hal,
            address,
            last: None,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl<H: IoCapable + ?Sized> EventStream for PolledLevels<'_, H> {
    type Item = PinLevelState;

    async fn next(&mut self) -> HalResult<PinLevelState> {
        loop {
            let level = self.hal.read(self.address)?;
            if self.last != Some(level) {
                self.last = Some(level);
                return Ok(level.into());
            }
            yield_now().await;
        }
    }
}

/// Edge stream that samples [`IoCapable::read`] and yields to the executor
/// between samples
///
/// The level at construction is the baseline; the first event is the
/// first transition away from it.
pub struct PolledEdges<'a, H: IoCapable + ?Sized> {
    hal: &'a H,
    address: Address,
    last: bool,
}

impl<'a, H: IoCapable + ?Sized> PolledEdges<'a, H> {
    /// Takes the baseline sample; fails if `address` cannot be read
    pub fn new(hal: &'a H, address: Address) -> HalResult<Self> {
        let last = hal.read(address)?;
        Ok(Self { hal, address, last })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl<H: IoCapable + ?Sized> EventStream for PolledEdges<'_, H> {
    type Item = PinEdgeState;

    async fn next(&mut self) -> HalResult<PinEdgeState> {
        loop {
            let level = self.hal.read(self.address)?;
            if level != self.last {
                self.last = level;
                return Ok(if level {
                    PinEdgeState::Rise
                } else {
                    PinEdgeState::Fall
                });
            }
            yield_now().await;
        }
    }
}
