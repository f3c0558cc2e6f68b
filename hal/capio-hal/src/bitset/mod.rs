//! Bit-indexed storage
//!
//! Two containers share one contract ([`Bits`]):
//!
//! - [`BitSet`] wraps a single unsigned machine word. Cheap to copy and the
//!   natural view of a register value.
//! - [`FixedBitSet`] holds a compile-time number of bits. Backends use it to
//!   assemble one register's worth of pin bits before a single write.
//!
//! Checked accessors ([`Bits::get`], [`Bits::set`], ...) fail with
//! [`BitSetError::OutOfBounds`]. The unchecked pair ([`Bits::test`],
//! [`Bits::put`]) is still bounds-checked: reads past the end return `false`
//! and writes past the end are ignored, for both containers.

mod fixed;
mod word;

use core::fmt;

pub use fixed::FixedBitSet;
pub use word::{BitSet, Word};

use crate::error::BitSetError;

/// Common bit set contract
pub trait Bits {
    /// Raw storage value produced by [`Bits::raw`] and the bitwise operators
    type Raw: Copy;

    /// Number of addressable bits
    fn len(&self) -> usize;

    /// Read a bit; `false` outside `0..len`
    fn test(&self, pos: usize) -> bool;

    /// Write a bit; ignored outside `0..len`
    fn put(&mut self, pos: usize, value: bool);

    /// Raw storage value
    fn raw(&self) -> Self::Raw;

    /// Replace the whole contents from a raw value
    fn set_raw(&mut self, raw: Self::Raw);

    /// True for a zero-width set
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked read
    fn get(&self, pos: usize) -> Result<bool, BitSetError> {
        self.check(pos)?;
        Ok(self.test(pos))
    }

    /// Checked write
    fn set(&mut self, pos: usize, value: bool) -> Result<(), BitSetError> {
        self.check(pos)?;
        self.put(pos, value);
        Ok(())
    }

    /// Checked clear of a single bit
    fn reset(&mut self, pos: usize) -> Result<(), BitSetError> {
        self.set(pos, false)
    }

    /// Checked toggle of a single bit
    fn flip(&mut self, pos: usize) -> Result<(), BitSetError> {
        let current = self.get(pos)?;
        self.put(pos, !current);
        Ok(())
    }

    /// Write `value` at every position
    ///
    /// All positions are checked first; on error nothing is modified.
    fn set_at(&mut self, value: bool, positions: &[usize]) -> Result<(), BitSetError> {
        for &pos in positions {
            self.check(pos)?;
        }
        for &pos in positions {
            self.put(pos, value);
        }
        Ok(())
    }

    /// Clear every position, with the same all-or-nothing check as [`Bits::set_at`]
    fn reset_at(&mut self, positions: &[usize]) -> Result<(), BitSetError> {
        self.set_at(false, positions)
    }

    /// Set every bit
    fn fill(&mut self) {
        for pos in 0..self.len() {
            self.put(pos, true);
        }
    }

    /// Clear every bit
    fn clear(&mut self) {
        for pos in 0..self.len() {
            self.put(pos, false);
        }
    }

    /// Toggle every bit
    fn invert(&mut self) {
        for pos in 0..self.len() {
            let current = self.test(pos);
            self.put(pos, !current);
        }
    }

    /// Every bit is set
    fn all(&self) -> bool {
        (0..self.len()).all(|pos| self.test(pos))
    }

    /// At least one bit is set
    fn any(&self) -> bool {
        (0..self.len()).any(|pos| self.test(pos))
    }

    /// No bit is set
    fn none(&self) -> bool {
        !self.any()
    }

    /// Number of set bits
    fn count_ones(&self) -> usize {
        (0..self.len()).filter(|&pos| self.test(pos)).count()
    }

    #[doc(hidden)]
    fn check(&self, pos: usize) -> Result<(), BitSetError> {
        if pos < self.len() {
            Ok(())
        } else {
            Err(BitSetError::OutOfBounds {
                index: pos,
                len: self.len(),
            })
        }
    }
}

/// Render `0b` followed by the bits, most significant first, `_` every byte
fn write_binary(f: &mut fmt::Formatter<'_>, bits: &impl Bits) -> fmt::Result {
    let len = bits.len();
    f.write_str("0b")?;
    for pos in (0..len).rev() {
        if pos + 1 != len && (pos + 1) % 8 == 0 {
            f.write_str("_")?;
        }
        f.write_str(if bits.test(pos) { "1" } else { "0" })?;
    }
    Ok(())
}
