//! Fixed-size bit set

use core::fmt;
use core::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
    ShrAssign,
};

use super::{write_binary, Bits};

/// Bit set with a compile-time number of bits
///
/// Raw conversions go through a `u64`; bits at or beyond position 64 are
/// addressable individually but are not part of the raw value. Operators
/// return the raw value masked to `N` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedBitSet<const N: usize> {
    bits: [bool; N],
}

impl<const N: usize> FixedBitSet<N> {
    /// Bits that fit into the raw value
    const RAW_BITS: usize = if N < 64 { N } else { 64 };

    /// Mask covering the raw bits
    const MASK: u64 = if N >= 64 { u64::MAX } else { (1u64 << N) - 1 };

    /// Empty set
    pub const fn new() -> Self {
        Self { bits: [false; N] }
    }

    /// Set backed by `raw`; `None` yields the empty set
    pub fn from_raw(raw: Option<u64>) -> Self {
        let mut set = Self::new();
        if let Some(raw) = raw {
            set.set_raw(raw);
        }
        set
    }

    /// `raw` cut down to the bits this set can hold
    const fn masked(raw: u64) -> u64 {
        raw & Self::MASK
    }
}

impl<const N: usize> Default for FixedBitSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<u64> for FixedBitSet<N> {
    fn from(raw: u64) -> Self {
        Self::from_raw(Some(raw))
    }
}

impl<const N: usize> From<Option<u64>> for FixedBitSet<N> {
    fn from(raw: Option<u64>) -> Self {
        Self::from_raw(raw)
    }
}

impl<const N: usize> Bits for FixedBitSet<N> {
    type Raw = u64;

    fn len(&self) -> usize {
        N
    }

    fn test(&self, pos: usize) -> bool {
        self.bits.get(pos).copied().unwrap_or(false)
    }

    fn put(&mut self, pos: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(pos) {
            *bit = value;
        }
    }

    fn raw(&self) -> u64 {
        self.bits[..Self::RAW_BITS]
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .fold(0, |acc, (pos, _)| acc | (1u64 << pos))
    }

    fn set_raw(&mut self, raw: u64) {
        for (pos, bit) in self.bits.iter_mut().enumerate() {
            *bit = pos < 64 && raw & (1u64 << pos) != 0;
        }
    }
}

impl<const N: usize> fmt::Display for FixedBitSet<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_binary(f, self)
    }
}

impl<const N: usize> BitAnd for FixedBitSet<N> {
    type Output = u64;
    fn bitand(self, rhs: Self) -> u64 {
        self.raw() & rhs.raw()
    }
}

impl<const N: usize> BitOr for FixedBitSet<N> {
    type Output = u64;
    fn bitor(self, rhs: Self) -> u64 {
        self.raw() | rhs.raw()
    }
}

impl<const N: usize> BitXor for FixedBitSet<N> {
    type Output = u64;
    fn bitxor(self, rhs: Self) -> u64 {
        self.raw() ^ rhs.raw()
    }
}

impl<const N: usize> BitAnd<u64> for FixedBitSet<N> {
    type Output = u64;
    fn bitand(self, rhs: u64) -> u64 {
        Self::masked(self.raw() & rhs)
    }
}

impl<const N: usize> BitOr<u64> for FixedBitSet<N> {
    type Output = u64;
    fn bitor(self, rhs: u64) -> u64 {
        Self::masked(self.raw() | rhs)
    }
}

impl<const N: usize> BitXor<u64> for FixedBitSet<N> {
    type Output = u64;
    fn bitxor(self, rhs: u64) -> u64 {
        Self::masked(self.raw() ^ rhs)
    }
}

impl<const N: usize> Not for FixedBitSet<N> {
    type Output = u64;
    fn not(self) -> u64 {
        Self::masked(!self.raw())
    }
}

impl<const N: usize> Shl<u32> for FixedBitSet<N> {
    type Output = u64;
    fn shl(self, amount: u32) -> u64 {
        Self::masked(self.raw().checked_shl(amount).unwrap_or(0))
    }
}

impl<const N: usize> Shr<u32> for FixedBitSet<N> {
    type Output = u64;
    fn shr(self, amount: u32) -> u64 {
        self.raw().checked_shr(amount).unwrap_or(0)
    }
}

impl<const N: usize> ShlAssign<u32> for FixedBitSet<N> {
    fn shl_assign(&mut self, amount: u32) {
        let amount = amount as usize;
        for pos in (0..N).rev() {
            let bit = pos >= amount && self.bits[pos - amount];
            self.bits[pos] = bit;
        }
    }
}

impl<const N: usize> ShrAssign<u32> for FixedBitSet<N> {
    fn shr_assign(&mut self, amount: u32) {
        let amount = amount as usize;
        for pos in 0..N {
            let bit = pos.checked_add(amount).is_some_and(|from| from < N && self.bits[from]);
            self.bits[pos] = bit;
        }
    }
}

impl<const N: usize> BitAndAssign<u64> for FixedBitSet<N> {
    fn bitand_assign(&mut self, rhs: u64) {
        let raw = *self & rhs;
        self.set_raw(raw);
    }
}

impl<const N: usize> BitOrAssign<u64> for FixedBitSet<N> {
    fn bitor_assign(&mut self, rhs: u64) {
        let raw = *self | rhs;
        self.set_raw(raw);
    }
}

impl<const N: usize> BitXorAssign<u64> for FixedBitSet<N> {
    fn bitxor_assign(&mut self, rhs: u64) {
        let raw = *self ^ rhs;
        self.set_raw(raw);
    }
}
