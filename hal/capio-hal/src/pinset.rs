//! Grouped pin handle

use core::ptr;

use heapless::{FnvIndexMap, Vec};

use crate::capability::{IoCapable, LevelMap, PinConfig, PinMode, PinPullState, MAX_PINS};
use crate::device::Address;
use crate::error::{HalError, PinError};
use crate::pin::{IoBase, Pin};

type ConfigMap = FnvIndexMap<Address, PinConfig, MAX_PINS>;

const CAPACITY_EXCEEDED: HalError = HalError::Unsupported("pin set holds at most MAX_PINS addresses");

/// Several addresses on one backend, driven and sampled together
///
/// Addresses are unique and keep the order in which they were first given.
/// Batch operations reach the backend as a single
/// [`IoCapable::write_all`] or [`IoCapable::read_all`] call.
pub struct PinSet<'a, H: IoCapable + ?Sized> {
    hal: &'a H,
    map: ConfigMap,
}

impl<'a, H: IoCapable + ?Sized> PinSet<'a, H> {
    /// Configure every address in `map`
    ///
    /// A repeated address takes the last configuration given for it. If any
    /// address fails to configure, the ones configured before it are reset
    /// and no pin set is produced.
    pub fn new(hal: &'a H, map: &[(Address, PinConfig)]) -> Result<Self, PinError> {
        let map = collect(map.iter().copied())?;
        Self::configure(hal, map)
    }

    /// Configure addresses from parallel lists
    ///
    /// See [`IoCapable::pinset_from_lists`].
    pub fn from_lists(
        hal: &'a H,
        addresses: &[Address],
        modes: &[PinMode],
        pulls: &[PinPullState],
    ) -> Result<Self, PinError> {
        let entries = addresses.iter().zip(modes).enumerate().map(|(index, (&address, &mode))| {
            let pull = pulls.get(index).copied().unwrap_or_default();
            (address, PinConfig::new(mode, pull))
        });
        Self::configure(hal, collect(entries)?)
    }

    /// Group pins that are already configured; no hardware access
    ///
    /// Every pin must have been configured on `hal` itself. A pin from
    /// another backend fails with [`HalError::Unsupported`].
    pub fn from_pins(hal: &'a H, pins: &[Pin<'a, H>]) -> Result<Self, PinError> {
        if !pins.iter().all(|pin| ptr::eq(pin.hal(), hal)) {
            return Err(HalError::Unsupported("pin configured on another backend").into());
        }
        let map = collect(pins.iter().map(|pin| (pin.address(), pin.config())))?;
        Ok(Self { hal, map })
    }

    fn configure(hal: &'a H, map: ConfigMap) -> Result<Self, PinError> {
        for (done, (&address, config)) in map.iter().enumerate() {
            if let Err(err) = hal.configure(address, config.mode, config.pull) {
                #[cfg(feature = "defmt")]
                defmt::warn!("configuring address {} failed, rolling back {} pins", address, done);
                for &configured in map.keys().take(done) {
                    if hal.reset_io(configured).is_err() {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("rollback reset of address {} failed", configured);
                    }
                }
                return Err(err.into());
            }
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("pin set configured on {}: {} addresses", hal.id(), map.len());
        Ok(Self { hal, map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Addresses in set order
    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.map.keys().copied()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.map.contains_key(&address)
    }

    pub fn mode(&self, address: Address) -> Option<PinMode> {
        self.map.get(&address).map(|config| config.mode)
    }

    pub fn pull(&self, address: Address) -> Option<PinPullState> {
        self.map.get(&address).map(|config| config.pull)
    }

    /// Pin for `address`, sharing this set's configuration
    pub fn pin(&self, address: Address) -> Result<Pin<'a, H>, PinError> {
        self.map
            .get(&address)
            .map(|&config| Pin::from_config(self.hal, address, config))
            .ok_or(PinError::NotFound(address))
    }

    /// Pin at position `index` in set order
    pub fn get(&self, index: usize) -> Option<Pin<'a, H>> {
        self.map
            .iter()
            .nth(index)
            .map(|(&address, &config)| Pin::from_config(self.hal, address, config))
    }

    /// Iterate over the pins in set order
    pub fn iter(&self) -> impl Iterator<Item = Pin<'a, H>> + '_ {
        self.map
            .iter()
            .map(|(&address, &config)| Pin::from_config(self.hal, address, config))
    }

    /// Sample every input-capable address with one batch read
    ///
    /// One entry per address in set order. Output-only addresses are
    /// `None`, never `Some(false)`.
    pub fn values(&self) -> Result<Vec<Option<bool>, MAX_PINS>, PinError> {
        let inputs: Vec<Address, MAX_PINS> = self
            .map
            .iter()
            .filter(|(_, config)| config.mode.is_input())
            .map(|(&address, _)| address)
            .collect();
        let levels = self.hal.read_all(&inputs)?;

        let mut values = Vec::new();
        for (address, config) in &self.map {
            let value = if config.mode.is_input() {
                let level = levels
                    .get(address)
                    .copied()
                    .ok_or(HalError::Unknown("batch read omitted a requested address"))?;
                Some(level)
            } else {
                None
            };
            values.push(value).map_err(|_| CAPACITY_EXCEEDED)?;
        }
        Ok(values)
    }

    /// Reset every address, continuing past failures
    ///
    /// Returns the first failure.
    pub fn reset(self) -> Result<(), PinError> {
        let mut first = Ok(());
        for &address in self.map.keys() {
            if let Err(err) = self.hal.reset_io(address) {
                if first.is_ok() {
                    first = Err(err.into());
                }
            }
        }
        first
    }

    fn drive(&self, value: bool) -> Result<(), PinError> {
        let mut levels = LevelMap::new();
        for (&address, config) in &self.map {
            if config.mode.is_output() {
                levels.insert(address, value).map_err(|_| CAPACITY_EXCEEDED)?;
            }
        }
        Ok(self.hal.write_all(&levels)?)
    }
}

impl<H: IoCapable + ?Sized> IoBase for PinSet<'_, H> {
    /// Drive every output-capable address high in one batch write
    fn on(&self) -> Result<(), PinError> {
        self.drive(true)
    }

    /// Drive every output-capable address low in one batch write
    fn off(&self) -> Result<(), PinError> {
        self.drive(false)
    }
}

impl<H: IoCapable + ?Sized> core::fmt::Debug for PinSet<'_, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PinSet")
            .field("device", &self.hal.id())
            .field("map", &self.map)
            .finish()
    }
}

fn collect(entries: impl Iterator<Item = (Address, PinConfig)>) -> Result<ConfigMap, PinError> {
    let mut map = ConfigMap::new();
    for (address, config) in entries {
        map.insert(address, config).map_err(|_| CAPACITY_EXCEEDED)?;
    }
    Ok(map)
}
