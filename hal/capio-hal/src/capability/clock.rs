//! Clock capability

use core::time::Duration;

use crate::device::Device;
use crate::error::HalResult;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Free-running time base
pub trait ClockCapable: Device {
    /// Tick rate of [`ClockCapable::ticks`], non-zero
    const FREQUENCY_HZ: u32;

    /// Ticks elapsed since boot
    fn ticks(&self) -> HalResult<u64>;

    /// Microseconds since boot, fractional below one tick
    fn time_since_boot(&self) -> HalResult<f64> {
        let ticks = self.ticks()?;
        Ok(ticks as f64 * 1_000_000.0 / f64::from(Self::FREQUENCY_HZ))
    }

    /// Time since boot as a [`Duration`]
    ///
    /// Integer arithmetic throughout; the result is exact to the nanosecond.
    fn duration_since_boot(&self) -> HalResult<Duration> {
        let ticks = self.ticks()?;
        let hz = u64::from(Self::FREQUENCY_HZ);
        let secs = ticks / hz;
        // remainder < hz <= u32::MAX, so the product fits in u64
        let nanos = (ticks % hz) * NANOS_PER_SEC / hz;
        Ok(Duration::new(secs, nanos as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock<const HZ: u32>(u64);

    impl<const HZ: u32> Device for FixedClock<HZ> {
        fn id(&self) -> &'static str {
            "fixed-clock"
        }
    }

    impl<const HZ: u32> ClockCapable for FixedClock<HZ> {
        const FREQUENCY_HZ: u32 = HZ;

        fn ticks(&self) -> HalResult<u64> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_megahertz_ticks_are_microseconds() {
        let clock = FixedClock::<1_000_000>(1_500_000);

        assert_eq!(clock.time_since_boot(), Ok(1_500_000.0));
        assert_eq!(clock.duration_since_boot(), Ok(Duration::from_millis(1500)));
    }

    #[test]
    fn test_sub_microsecond_ticks_keep_precision() {
        let clock = FixedClock::<32_768>(1);

        assert_eq!(clock.time_since_boot(), Ok(30.517578125));
        assert_eq!(clock.duration_since_boot(), Ok(Duration::from_nanos(30_517)));
    }

    #[test]
    fn test_counter_near_wrap() {
        let clock = FixedClock::<1_000_000>(u64::MAX);
        let duration = clock.duration_since_boot().unwrap();

        assert_eq!(duration.as_secs(), u64::MAX / 1_000_000);
        assert_eq!(duration.subsec_nanos(), 551_615_000);
    }
}
