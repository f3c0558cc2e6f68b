//! Error taxonomy
//!
//! Backends report [`HalError`], typed pins wrap it in [`PinError`], and the
//! bit set engine has its own [`BitSetError`]. Every fallible call returns
//! one of these; nothing is retried or swallowed on the caller's behalf.

use core::fmt;

use crate::capability::PinMode;
use crate::device::Address;

/// Errors reported by capability implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Address outside the range the backend supports
    UnknownAddress {
        message: &'static str,
        address: Address,
    },
    /// The hardware cannot express the requested configuration
    Unsupported(&'static str),
    /// The backend ended up in a state it cannot account for
    Unknown(&'static str),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAddress { message, address } => {
                write!(f, "{} (address {})", message, address)
            }
            Self::Unsupported(message) => write!(f, "unsupported: {}", message),
            Self::Unknown(message) => write!(f, "unknown backend state: {}", message),
        }
    }
}

/// Errors from [`Pin`](crate::Pin) and [`PinSet`](crate::PinSet) operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Operation incompatible with the pin's configured mode
    WrongMode { actual: PinMode, expected: PinMode },
    /// Address is not part of the pin set
    NotFound(Address),
    /// The backend rejected the operation
    Hal(HalError),
}

impl From<HalError> for PinError {
    fn from(err: HalError) -> Self {
        PinError::Hal(err)
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongMode { actual, expected } => {
                write!(f, "pin is {:?}, operation needs {:?}", actual, expected)
            }
            Self::NotFound(address) => write!(f, "address {} is not in the pin set", address),
            Self::Hal(err) => err.fmt(f),
        }
    }
}

impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Errors from checked bit set access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitSetError {
    /// Index outside `0..len`
    OutOfBounds { index: usize, len: usize },
}

impl fmt::Display for BitSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, len } => {
                write!(f, "bit index {} out of bounds for length {}", index, len)
            }
        }
    }
}

// Backends only index bit sets with positions taken from their own layout
// tables, so a failure here means the table is wrong.
impl From<BitSetError> for HalError {
    fn from(_: BitSetError) -> Self {
        HalError::Unknown("register bit index outside register width")
    }
}

/// Result type for capability operations
pub type HalResult<T> = Result<T, HalError>;
