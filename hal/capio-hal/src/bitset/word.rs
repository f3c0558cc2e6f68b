//! Word-backed bit set

use core::fmt;
use core::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
    ShrAssign,
};

use super::{write_binary, Bits};

/// Unsigned integer usable as bit set storage
pub trait Word: Copy + Eq + fmt::Debug {
    /// Width in bits
    const BITS: u32;
    /// All bits clear
    const ZERO: Self;
    /// All bits set
    const ONES: Self;

    /// `1 << pos`, or zero when `pos` is past the word
    fn bit(pos: u32) -> Self;

    /// Shift left; zero when shifting the whole word out
    fn shifted_left(self, amount: u32) -> Self;

    /// Shift right; zero when shifting the whole word out
    fn shifted_right(self, amount: u32) -> Self;

    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    fn complement(self) -> Self;
    fn ones(self) -> u32;
}

/// Bit set over one unsigned word
///
/// The index domain is `0..W::BITS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitSet<W: Word = u32> {
    value: W,
}

impl<W: Word> BitSet<W> {
    /// Empty set (all bits clear)
    pub const fn new() -> Self {
        Self { value: W::ZERO }
    }

    /// Set backed by `raw`; `None` yields the empty set
    pub fn from_raw(raw: Option<W>) -> Self {
        Self {
            value: raw.unwrap_or(W::ZERO),
        }
    }

    /// Underlying word
    pub fn value(&self) -> W {
        self.value
    }
}

impl<W: Word> Default for BitSet<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word> From<W> for BitSet<W> {
    fn from(raw: W) -> Self {
        Self { value: raw }
    }
}

impl<W: Word> From<Option<W>> for BitSet<W> {
    fn from(raw: Option<W>) -> Self {
        Self::from_raw(raw)
    }
}

impl<W: Word> Bits for BitSet<W> {
    type Raw = W;

    fn len(&self) -> usize {
        W::BITS as usize
    }

    fn test(&self, pos: usize) -> bool {
        pos < self.len() && self.value.and(W::bit(pos as u32)) != W::ZERO
    }

    fn put(&mut self, pos: usize, value: bool) {
        if pos >= self.len() {
            return;
        }
        let mask = W::bit(pos as u32);
        self.value = if value {
            self.value.or(mask)
        } else {
            self.value.and(mask.complement())
        };
    }

    fn raw(&self) -> W {
        self.value
    }

    fn set_raw(&mut self, raw: W) {
        self.value = raw;
    }

    fn fill(&mut self) {
        self.value = W::ONES;
    }

    fn clear(&mut self) {
        self.value = W::ZERO;
    }

    fn invert(&mut self) {
        self.value = self.value.complement();
    }

    fn all(&self) -> bool {
        self.value == W::ONES
    }

    fn any(&self) -> bool {
        self.value != W::ZERO
    }

    fn count_ones(&self) -> usize {
        self.value.ones() as usize
    }
}

impl<W: Word> fmt::Display for BitSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_binary(f, self)
    }
}

impl<W: Word> BitAnd for BitSet<W> {
    type Output = W;
    fn bitand(self, rhs: Self) -> W {
        self.value.and(rhs.value)
    }
}

impl<W: Word> BitOr for BitSet<W> {
    type Output = W;
    fn bitor(self, rhs: Self) -> W {
        self.value.or(rhs.value)
    }
}

impl<W: Word> BitXor for BitSet<W> {
    type Output = W;
    fn bitxor(self, rhs: Self) -> W {
        self.value.xor(rhs.value)
    }
}

impl<W: Word> Not for BitSet<W> {
    type Output = W;
    fn not(self) -> W {
        self.value.complement()
    }
}

impl<W: Word> Shl<u32> for BitSet<W> {
    type Output = W;
    fn shl(self, amount: u32) -> W {
        self.value.shifted_left(amount)
    }
}

impl<W: Word> Shr<u32> for BitSet<W> {
    type Output = W;
    fn shr(self, amount: u32) -> W {
        self.value.shifted_right(amount)
    }
}

impl<W: Word> ShlAssign<u32> for BitSet<W> {
    fn shl_assign(&mut self, amount: u32) {
        self.value = self.value.shifted_left(amount);
    }
}

impl<W: Word> ShrAssign<u32> for BitSet<W> {
    fn shr_assign(&mut self, amount: u32) {
        self.value = self.value.shifted_right(amount);
    }
}

macro_rules! impl_word {
    ($($t:ty),* $(,)?) => {
        $(
            impl Word for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;
                const ONES: Self = <$t>::MAX;

                fn bit(pos: u32) -> Self {
                    (1 as $t).checked_shl(pos).unwrap_or(0)
                }

                fn shifted_left(self, amount: u32) -> Self {
                    self.checked_shl(amount).unwrap_or(0)
                }

                fn shifted_right(self, amount: u32) -> Self {
                    self.checked_shr(amount).unwrap_or(0)
                }

                fn and(self, rhs: Self) -> Self {
                    self & rhs
                }

                fn or(self, rhs: Self) -> Self {
                    self | rhs
                }

                fn xor(self, rhs: Self) -> Self {
                    self ^ rhs
                }

                fn complement(self) -> Self {
                    !self
                }

                fn ones(self) -> u32 {
                    <$t>::count_ones(self)
                }
            }

            impl BitAnd<$t> for BitSet<$t> {
                type Output = $t;
                fn bitand(self, rhs: $t) -> $t {
                    self.value & rhs
                }
            }

            impl BitOr<$t> for BitSet<$t> {
                type Output = $t;
                fn bitor(self, rhs: $t) -> $t {
                    self.value | rhs
                }
            }

            impl BitXor<$t> for BitSet<$t> {
                type Output = $t;
                fn bitxor(self, rhs: $t) -> $t {
                    self.value ^ rhs
                }
            }

            impl BitAndAssign<$t> for BitSet<$t> {
                fn bitand_assign(&mut self, rhs: $t) {
                    self.value &= rhs;
                }
            }

            impl BitOrAssign<$t> for BitSet<$t> {
                fn bitor_assign(&mut self, rhs: $t) {
                    self.value |= rhs;
                }
            }

            impl BitXorAssign<$t> for BitSet<$t> {
                fn bitxor_assign(&mut self, rhs: $t) {
                    self.value ^= rhs;
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64, usize);
