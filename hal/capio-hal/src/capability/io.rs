//! Digital I/O capability

use crate::capability::{LevelMap, PinConfig, PinMode, PinPullState};
use crate::device::{Address, Device};
use crate::error::{HalResult, PinError};
use crate::pin::Pin;
use crate::pinset::PinSet;

/// Read, drive and configure digital pins by logical address
///
/// `true` is a high level, `false` a low level. Addresses are backend
/// defined; anything outside the supported range fails with
/// [`HalError::UnknownAddress`](crate::HalError::UnknownAddress) before the
/// hardware is touched.
///
/// All methods take `&self`: a backend is shared by every [`Pin`] and
/// [`PinSet`] derived from it and relies on register-level atomicity, not
/// on Rust exclusivity. One logical owner per backend is assumed.
pub trait IoCapable: Device {
    /// Read the level at `address`
    fn read(&self, address: Address) -> HalResult<bool>;

    /// Drive `address` high or low
    fn write(&self, address: Address, value: bool) -> HalResult<()>;

    /// Configure direction and pull resistor
    ///
    /// Fails with [`HalError::Unsupported`](crate::HalError::Unsupported)
    /// when the hardware cannot express `mode`.
    fn configure(&self, address: Address, mode: PinMode, pull: PinPullState) -> HalResult<()>;

    /// Return `address` to its neutral state; may be a no-op
    fn reset_io(&self, address: Address) -> HalResult<()>;

    /// Read several addresses at once
    ///
    /// Every address is validated before any register access. Duplicate
    /// addresses collapse into one entry.
    fn read_all(&self, addresses: &[Address]) -> HalResult<LevelMap>;

    /// Drive several addresses at once
    ///
    /// Every address is validated before any register access; one invalid
    /// address aborts the call with no pin changed.
    fn write_all(&self, levels: &LevelMap) -> HalResult<()>;

    /// Configure `address` and wrap it in a typed [`Pin`]
    fn pin(&self, address: Address, mode: PinMode, pull: PinPullState) -> Result<Pin<'_, Self>, PinError> {
        Pin::new(self, address, mode, pull)
    }

    /// Configure every entry of `map` and wrap them in a [`PinSet`]
    ///
    /// Later entries for the same address replace earlier ones.
    fn pinset(&self, map: &[(Address, PinConfig)]) -> Result<PinSet<'_, Self>, PinError> {
        PinSet::new(self, map)
    }

    /// Build a [`PinSet`] from parallel lists
    ///
    /// `addresses` and `modes` are zipped positionally and truncated to the
    /// shorter one. Missing pulls default to [`PinPullState::None`].
    fn pinset_from_lists(
        &self,
        addresses: &[Address],
        modes: &[PinMode],
        pulls: &[PinPullState],
    ) -> Result<PinSet<'_, Self>, PinError> {
        PinSet::from_lists(self, addresses, modes, pulls)
    }

    /// Run `f` with a freshly configured pin, then reset it
    ///
    /// The reset runs whether `f` succeeds or fails. An error from `f`
    /// takes precedence over a reset failure, which is then only logged.
    fn with_pin<R, E, F>(
        &self,
        address: Address,
        mode: PinMode,
        pull: PinPullState,
        f: F,
    ) -> Result<R, E>
    where
        Self: Sized,
        E: From<PinError>,
        F: FnOnce(&Pin<'_, Self>) -> Result<R, E>,
    {
        let pin = Pin::new(self, address, mode, pull)?;
        let result = f(&pin);
        finish(result, pin.reset())
    }

    /// Run `f` with a freshly configured pin set, then reset every address
    ///
    /// Same error precedence as [`IoCapable::with_pin`].
    fn with_pinset<R, E, F>(&self, map: &[(Address, PinConfig)], f: F) -> Result<R, E>
    where
        Self: Sized,
        E: From<PinError>,
        F: FnOnce(&PinSet<'_, Self>) -> Result<R, E>,
    {
        let pinset = PinSet::new(self, map)?;
        let result = f(&pinset);
        finish(result, pinset.reset())
    }
}

fn finish<R, E: From<PinError>>(result: Result<R, E>, cleanup: Result<(), PinError>) -> Result<R, E> {
    match (result, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup_err)) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("reset after failed scoped use also failed: {}", cleanup_err);
            #[cfg(not(feature = "defmt"))]
            let _ = cleanup_err;
            Err(err)
        }
    }
}
