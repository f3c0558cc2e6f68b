//! Property tests for the capability contracts and bit set engine

use core::cell::{Cell, RefCell};

use capio_hal::{
    Address, BitSet, Bits, Device, FixedBitSet, HalError, HalResult, IoBase, IoCapable, LevelMap,
    PinConfig, PinError, PinMode, PinPullState,
};
use proptest::prelude::*;

const PINS: usize = 58;

/// Backend whose pins latch whatever is written and read it back
struct LatchIo {
    levels: RefCell<[bool; PINS]>,
    mutations: Cell<usize>,
}

impl LatchIo {
    fn new() -> Self {
        Self {
            levels: RefCell::new([false; PINS]),
            mutations: Cell::new(0),
        }
    }

    fn snapshot(&self) -> [bool; PINS] {
        *self.levels.borrow()
    }

    fn check(address: Address) -> HalResult<usize> {
        if (address as usize) < PINS {
            Ok(address as usize)
        } else {
            Err(HalError::UnknownAddress {
                message: "invalid GPIO pin address",
                address,
            })
        }
    }
}

impl Device for LatchIo {
    fn id(&self) -> &'static str {
        "latch-io"
    }
}

impl IoCapable for LatchIo {
    fn read(&self, address: Address) -> HalResult<bool> {
        Ok(self.levels.borrow()[Self::check(address)?])
    }

    fn write(&self, address: Address, value: bool) -> HalResult<()> {
        let index = Self::check(address)?;
        self.mutations.set(self.mutations.get() + 1);
        self.levels.borrow_mut()[index] = value;
        Ok(())
    }

    fn configure(&self, address: Address, _mode: PinMode, _pull: PinPullState) -> HalResult<()> {
        Self::check(address)?;
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }

    fn reset_io(&self, address: Address) -> HalResult<()> {
        Self::check(address).map(|_| ())
    }

    fn read_all(&self, addresses: &[Address]) -> HalResult<LevelMap> {
        let indices = addresses
            .iter()
            .map(|&address| Self::check(address))
            .collect::<HalResult<Vec<_>>>()?;
        let levels = self.levels.borrow();
        let mut map = LevelMap::new();
        for (&address, index) in addresses.iter().zip(indices) {
            map.insert(address, levels[index])
                .map_err(|_| HalError::Unsupported("too many addresses"))?;
        }
        Ok(map)
    }

    fn write_all(&self, levels: &LevelMap) -> HalResult<()> {
        for &address in levels.keys() {
            Self::check(address)?;
        }
        for (&address, &value) in levels {
            self.write(address, value)?;
        }
        Ok(())
    }
}

fn mode_strategy() -> impl Strategy<Value = PinMode> {
    prop_oneof![
        Just(PinMode::Input),
        Just(PinMode::Output),
        Just(PinMode::InputOutput),
    ]
}

proptest! {
    #[test]
    fn prop_write_then_read_round_trips(address in 0u32..=57, value in any::<bool>()) {
        let io = LatchIo::new();
        let pin = io.pin(address, PinMode::InputOutput, PinPullState::None).unwrap();

        if value { pin.on().unwrap() } else { pin.off().unwrap() }

        prop_assert_eq!(pin.value(), Ok(value));
        prop_assert_eq!(io.read(address), Ok(value));
    }

    #[test]
    fn prop_out_of_range_addresses_are_rejected(address in 58u32.., value in any::<bool>()) {
        let io = LatchIo::new();

        let unknown = |result: HalResult<()>| {
            matches!(result, Err(HalError::UnknownAddress { address: a, .. }) if a == address)
        };
        prop_assert!(unknown(io.read(address).map(|_| ())));
        prop_assert!(unknown(io.write(address, value)));
        prop_assert!(unknown(io.configure(address, PinMode::Output, PinPullState::None)));
        prop_assert_eq!(io.mutations.get(), 0);
    }

    #[test]
    fn prop_batch_write_with_invalid_address_changes_nothing(
        valid in prop::collection::hash_set(0u32..58, 9),
        invalid in 58u32..1024,
        value in any::<bool>(),
        slot in 0usize..10,
    ) {
        let io = LatchIo::new();
        for &address in valid.iter().step_by(2) {
            io.write(address, !value).unwrap();
        }
        let before = io.snapshot();

        let mut addresses: Vec<Address> = valid.into_iter().collect();
        addresses.insert(slot, invalid);
        let mut levels = LevelMap::new();
        for &address in &addresses {
            levels.insert(address, value).unwrap();
        }

        let result = io.write_all(&levels);

        prop_assert!(
            matches!(result, Err(HalError::UnknownAddress { address, .. }) if address == invalid),
            "unexpected result {:?}",
            result
        );
        prop_assert_eq!(io.snapshot(), before);
    }

    #[test]
    fn prop_batch_read_with_invalid_address_fails(
        valid in prop::collection::vec(0u32..58, 0..20),
        invalid in 58u32..,
    ) {
        let io = LatchIo::new();
        let mut addresses = valid;
        addresses.push(invalid);

        prop_assert!(
            matches!(io.read_all(&addresses), Err(HalError::UnknownAddress { .. })),
            "invalid address {} was accepted",
            invalid
        );
    }

    #[test]
    fn prop_pinset_values_align_with_modes(
        modes in prop::collection::vec(mode_strategy(), 1..16),
        levels in prop::collection::vec(any::<bool>(), 16),
    ) {
        let io = LatchIo::new();
        for (address, &level) in levels.iter().enumerate() {
            io.write(address as Address, level).unwrap();
        }
        let map: Vec<(Address, PinConfig)> = modes
            .iter()
            .enumerate()
            .map(|(address, &mode)| (address as Address, PinConfig::from(mode)))
            .collect();

        let set = io.pinset(&map).unwrap();
        let values = set.values().unwrap();

        prop_assert_eq!(values.len(), modes.len());
        for (index, (value, mode)) in values.iter().zip(&modes).enumerate() {
            if mode.is_input() {
                prop_assert_eq!(*value, Some(levels[index]));
            } else {
                prop_assert_eq!(*value, None);
            }
        }
    }

    #[test]
    fn prop_input_pins_never_drive(address in 0u32..58) {
        let io = LatchIo::new();
        let pin = io.pin(address, PinMode::Input, PinPullState::PullUp).unwrap();
        let wrong_mode = Err(PinError::WrongMode {
            actual: PinMode::Input,
            expected: PinMode::Output,
        });

        prop_assert_eq!(pin.on(), wrong_mode);
        prop_assert_eq!(pin.off(), wrong_mode);
        prop_assert!(pin.value().is_ok());
        prop_assert!(!io.read(address).unwrap());
    }

    #[test]
    fn prop_set_at_marks_exactly_listed_bits(
        positions in prop::collection::btree_set(0usize..32, 0..32),
    ) {
        let list: Vec<usize> = positions.iter().copied().collect();
        let mut word = BitSet::<u32>::new();
        let mut fixed = FixedBitSet::<32>::new();

        word.set_at(true, &list).unwrap();
        fixed.set_at(true, &list).unwrap();

        prop_assert_eq!(word.count_ones(), positions.len());
        prop_assert_eq!(u64::from(word.raw()), fixed.raw());
        for pos in 0..32 {
            prop_assert_eq!(word.test(pos), positions.contains(&pos));
        }
    }

    #[test]
    fn prop_whole_word_operations(raw in any::<u8>()) {
        let mut bits = BitSet::from(raw);

        bits.fill();
        prop_assert!(bits.all());
        bits.clear();
        prop_assert!(bits.none());
        bits.invert();
        prop_assert!(bits.all());
    }
}

#[test]
fn set_at_on_wide_set() {
    let mut bits = BitSet::<u8>::new();
    bits.set_at(true, &[1, 3, 5]).unwrap();

    assert_eq!(bits.count_ones(), 3);
    assert_eq!(bits.raw(), 0b0010_1010);
}

#[test]
fn fixed_seven_bit_set() {
    let bits = FixedBitSet::<7>::from(0b0100001u64);

    assert_eq!(bits.len(), 7);
    assert_eq!(bits.count_ones(), 2);
}
