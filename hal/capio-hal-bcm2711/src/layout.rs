//! Address to bitfield table
//!
//! Every logical pin address maps to one field in each register family:
//!
//! | family   | bits/pin | pins/register | registers |
//! |----------|----------|---------------|-----------|
//! | select   | 3        | 10            | 6         |
//! | pull     | 2        | 16            | 4         |
//! | level    | 1        | 32            | 2         |
//! | set      | 1        | 32            | 2         |
//! | clear    | 1        | 32            | 2         |
//!
//! The table is computed at compile time; decoding an address is one
//! bounds check and an index.

use capio_hal::{Address, HalError, HalResult};

use crate::regs::{bank, GPCLR0, GPFSEL0, GPIO_PUP_PDN_CNTRL_REG0, GPLEV0, GPSET0};

/// Number of GPIO lines, addresses `0..PIN_COUNT`
pub const PIN_COUNT: usize = 58;

/// Lines in the first 32-bit level/set/clear register
pub const BANK0_PINS: usize = 32;

/// Lines in the second 32-bit level/set/clear register
pub const BANK1_PINS: usize = PIN_COUNT - BANK0_PINS;

/// A bitfield inside one register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Byte offset of the register from the block base
    pub offset: usize,
    /// Register number within its family
    pub register: usize,
    /// Position of the field's lowest bit
    pub shift: u32,
    /// Field width in bits
    pub width: u32,
}

impl Field {
    /// Unshifted all-ones value of the field width
    pub const fn max(&self) -> u32 {
        (1 << self.width) - 1
    }

    /// Field bits in place
    pub const fn mask(&self) -> u32 {
        self.max() << self.shift
    }

    /// Read the field out of a register value
    pub const fn extract(&self, register: u32) -> u32 {
        (register >> self.shift) & self.max()
    }

    /// Replace the field in a register value, leaving other fields intact
    pub const fn insert(&self, register: u32, value: u32) -> u32 {
        (register & !self.mask()) | ((value & self.max()) << self.shift)
    }
}

#[derive(Clone, Copy)]
struct Geometry {
    first: usize,
    width: u32,
    per_register: usize,
}

impl Geometry {
    const fn field(&self, pin: usize) -> Field {
        let register = pin / self.per_register;
        Field {
            offset: bank(self.first, register),
            register,
            shift: (pin % self.per_register) as u32 * self.width,
            width: self.width,
        }
    }
}

const SELECT: Geometry = Geometry {
    first: GPFSEL0,
    width: 3,
    per_register: 10,
};

const PULL: Geometry = Geometry {
    first: GPIO_PUP_PDN_CNTRL_REG0,
    width: 2,
    per_register: 16,
};

const fn single_bit(first: usize) -> Geometry {
    Geometry {
        first,
        width: 1,
        per_register: BANK0_PINS,
    }
}

/// Fields for one pin in every register family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinLayout {
    pub select: Field,
    pub pull: Field,
    pub level: Field,
    pub set: Field,
    pub clear: Field,
}

impl PinLayout {
    const fn for_pin(pin: usize) -> Self {
        Self {
            select: SELECT.field(pin),
            pull: PULL.field(pin),
            level: single_bit(GPLEV0).field(pin),
            set: single_bit(GPSET0).field(pin),
            clear: single_bit(GPCLR0).field(pin),
        }
    }

    /// Level/set/clear register number, 0 or 1
    pub const fn bank(&self) -> usize {
        self.level.register
    }

    /// Bit position inside the level/set/clear register
    pub const fn bit(&self) -> usize {
        self.level.shift as usize
    }
}

/// Layout of every pin, indexed by address
pub static LAYOUT: [PinLayout; PIN_COUNT] = build();

const fn build() -> [PinLayout; PIN_COUNT] {
    let mut table = [PinLayout::for_pin(0); PIN_COUNT];
    let mut pin = 1;
    while pin < PIN_COUNT {
        table[pin] = PinLayout::for_pin(pin);
        pin += 1;
    }
    table
}

/// Decode `address`
pub fn lookup(address: Address) -> HalResult<&'static PinLayout> {
    LAYOUT.get(address as usize).ok_or(HalError::UnknownAddress {
        message: "invalid GPIO pin address",
        address,
    })
}

/// Fail on the first address outside `0..PIN_COUNT`
pub fn validate(addresses: impl IntoIterator<Item = Address>) -> HalResult<()> {
    for address in addresses {
        lookup(address)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_fields() {
        let pin_0 = LAYOUT[0].select;
        let pin_9 = LAYOUT[9].select;
        let pin_57 = LAYOUT[57].select;

        assert_eq!((pin_0.offset, pin_0.shift, pin_0.width), (0x00, 0, 3));
        assert_eq!((pin_9.offset, pin_9.shift), (0x00, 27));
        assert_eq!((pin_57.offset, pin_57.register, pin_57.shift), (0x14, 5, 21));
    }

    #[test]
    fn test_pull_fields() {
        assert_eq!((LAYOUT[15].pull.offset, LAYOUT[15].pull.shift), (0xe4, 30));
        assert_eq!((LAYOUT[16].pull.offset, LAYOUT[16].pull.shift), (0xe8, 0));
        assert_eq!((LAYOUT[57].pull.offset, LAYOUT[57].pull.shift), (0xf0, 18));
    }

    #[test]
    fn test_single_bit_fields() {
        let pin_31 = LAYOUT[31];
        let pin_32 = LAYOUT[32];

        assert_eq!((pin_31.bank(), pin_31.bit()), (0, 31));
        assert_eq!((pin_32.bank(), pin_32.bit()), (1, 0));
        assert_eq!(pin_32.set.offset, 0x20);
        assert_eq!(pin_32.clear.offset, 0x2c);
        assert_eq!(pin_32.level.offset, 0x38);
        assert_eq!(LAYOUT[57].bit(), BANK1_PINS - 1);
    }

    #[test]
    fn test_insert_preserves_neighbours() {
        let field = LAYOUT[12].select;
        let register = 0xFFFF_FFFF;

        let updated = field.insert(register, 0b001);

        assert_eq!(field.extract(updated), 0b001);
        assert_eq!(updated | field.mask(), register);
    }

    #[test]
    fn test_lookup_rejects_out_of_range() {
        assert!(lookup(57).is_ok());
        assert_eq!(
            lookup(58),
            Err(HalError::UnknownAddress {
                message: "invalid GPIO pin address",
                address: 58,
            })
        );
        assert!(validate([0, 12, 200]).is_err());
        assert!(validate([]).is_ok());
    }
}
