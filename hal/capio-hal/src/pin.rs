//! Typed pin handle

use crate::capability::{
    AsyncIoCapable, EventStream, IoCapable, PinConfig, PinEdgeState, PinLevelState, PinMode,
    PinPullState,
};
use crate::device::Address;
use crate::error::PinError;

/// Drive one or more pins high or low together
pub trait IoBase {
    /// Drive high
    fn on(&self) -> Result<(), PinError>;

    /// Drive low
    fn off(&self) -> Result<(), PinError>;
}

/// One configured address on a backend
///
/// The mode is fixed at construction. Operations that the mode does not
/// permit fail with [`PinError::WrongMode`] and leave the pin untouched.
/// Dropping a `Pin` has no hardware effect; use [`Pin::reset`] to return
/// it to its neutral state.
pub struct Pin<'a, H: IoCapable + ?Sized> {
    hal: &'a H,
    address: Address,
    mode: PinMode,
    pull: PinPullState,
}

impl<'a, H: IoCapable + ?Sized> Pin<'a, H> {
    /// Configure `address` on `hal`
    ///
    /// No pin is produced if configuration fails.
    pub fn new(hal: &'a H, address: Address, mode: PinMode, pull: PinPullState) -> Result<Self, PinError> {
        hal.configure(address, mode, pull)?;
        Ok(Self::from_config(hal, address, PinConfig::new(mode, pull)))
    }

    /// Backend this pin was configured on
    pub(crate) fn hal(&self) -> &'a H {
        self.hal
    }

    /// Wrap an address that is already configured
    pub(crate) fn from_config(hal: &'a H, address: Address, config: PinConfig) -> Self {
        Self {
            hal,
            address,
            mode: config.mode,
            pull: config.pull,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    pub fn pull(&self) -> PinPullState {
        self.pull
    }

    pub fn config(&self) -> PinConfig {
        PinConfig::new(self.mode, self.pull)
    }

    /// Read the input level
    pub fn value(&self) -> Result<bool, PinError> {
        self.require_input()?;
        Ok(self.hal.read(self.address)?)
    }

    /// Return the address to its neutral state, consuming this handle
    ///
    /// ```compile_fail
    /// use capio_hal::{IoCapable, Pin};
    ///
    /// fn reuse<H: IoCapable>(pin: Pin<'_, H>) {
    ///     let _ = pin.reset();
    ///     let _ = pin.value();
    /// }
    /// ```
    pub fn reset(self) -> Result<(), PinError> {
        self.hal.reset_io(self.address)?;
        Ok(())
    }

    fn drive(&self, value: bool) -> Result<(), PinError> {
        if !self.mode.is_output() {
            return Err(PinError::WrongMode {
                actual: self.mode,
                expected: PinMode::Output,
            });
        }
        Ok(self.hal.write(self.address, value)?)
    }

    fn require_input(&self) -> Result<(), PinError> {
        if self.mode.is_input() {
            Ok(())
        } else {
            Err(PinError::WrongMode {
                actual: self.mode,
                expected: PinMode::Input,
            })
        }
    }
}

impl<'a, H: AsyncIoCapable + ?Sized> Pin<'a, H> {
    /// Stream the pin level, starting with the current one
    pub fn level_stream(&self) -> Result<H::LevelStream<'a>, PinError> {
        self.require_input()?;
        Ok(self.hal.pin_level_state(self.address)?)
    }

    /// Stream rising and falling edges
    pub fn edge_stream(&self) -> Result<H::EdgeStream<'a>, PinError> {
        self.require_input()?;
        Ok(self.hal.pin_edge_state(self.address)?)
    }
}

impl<H: IoCapable + ?Sized> IoBase for Pin<'_, H> {
    fn on(&self) -> Result<(), PinError> {
        self.drive(true)
    }

    fn off(&self) -> Result<(), PinError> {
        self.drive(false)
    }
}

impl<H: IoCapable + ?Sized> Clone for Pin<'_, H> {
    fn clone(&self) -> Self {
        Self::from_config(self.hal, self.address, self.config())
    }
}

impl<H: IoCapable + ?Sized> core::fmt::Debug for Pin<'_, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pin")
            .field("device", &self.hal.id())
            .field("address", &self.address)
            .field("mode", &self.mode)
            .field("pull", &self.pull)
            .finish()
    }
}

impl<H: IoCapable + ?Sized> embedded_hal::digital::ErrorType for Pin<'_, H> {
    type Error = PinError;
}

impl<H: IoCapable + ?Sized> embedded_hal::digital::OutputPin for Pin<'_, H> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

impl<H: IoCapable + ?Sized> embedded_hal::digital::InputPin for Pin<'_, H> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.value()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.value()?)
    }
}

impl<H: AsyncIoCapable + ?Sized> embedded_hal_async::digital::Wait for Pin<'_, H> {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.wait_for_level(PinLevelState::High).await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.wait_for_level(PinLevelState::Low).await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_edge(Some(PinEdgeState::Rise)).await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_edge(Some(PinEdgeState::Fall)).await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_edge(None).await
    }
}

impl<H: AsyncIoCapable + ?Sized> Pin<'_, H> {
    async fn wait_for_level(&self, target: PinLevelState) -> Result<(), PinError> {
        let mut levels = self.level_stream()?;
        while levels.next().await? != target {}
        Ok(())
    }

    async fn wait_for_edge(&self, target: Option<PinEdgeState>) -> Result<(), PinError> {
        let mut edges = self.edge_stream()?;
        loop {
            let edge = edges.next().await?;
            if target.is_none_or(|target| target == edge) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HalError;
    use crate::mock::MockIo;
    use embassy_futures::block_on;
    use embedded_hal::digital::{InputPin, OutputPin};
    use embedded_hal_async::digital::Wait;

    #[test]
    fn test_construction_configures_backend() {
        let io = MockIo::new();
        let pin = Pin::new(&io, 17, PinMode::Output, PinPullState::PullDown).unwrap();

        assert_eq!(pin.address(), 17);
        assert_eq!(
            io.config(17),
            Some(PinConfig::new(PinMode::Output, PinPullState::PullDown))
        );
    }

    #[test]
    fn test_failed_configuration_yields_no_pin() {
        let io = MockIo::new();
        io.fail_configure(21);

        let result = Pin::new(&io, 21, PinMode::Output, PinPullState::None);

        assert!(matches!(result, Err(PinError::Hal(HalError::Unsupported(_)))));
    }

    #[test]
    fn test_input_pin_refuses_to_drive() {
        let io = MockIo::new();
        io.drive(2, true);
        let pin = io.pin(2, PinMode::Input, PinPullState::None).unwrap();

        let expected = Err(PinError::WrongMode {
            actual: PinMode::Input,
            expected: PinMode::Output,
        });
        assert_eq!(pin.on(), expected);
        assert_eq!(pin.off(), expected);
        assert_eq!(pin.value(), Ok(true));
        assert_eq!(pin.mode(), PinMode::Input);
        assert_eq!(io.writes(), 0);
    }

    #[test]
    fn test_output_pin_refuses_to_read() {
        let io = MockIo::new();
        let pin = io.pin(6, PinMode::Output, PinPullState::None).unwrap();

        pin.on().unwrap();
        assert!(io.level(6));
        assert_eq!(
            pin.value(),
            Err(PinError::WrongMode {
                actual: PinMode::Output,
                expected: PinMode::Input,
            })
        );
        assert!(matches!(pin.level_stream(), Err(PinError::WrongMode { .. })));
    }

    #[test]
    fn test_reset_returns_pin_to_neutral() {
        let io = MockIo::new();
        let pin = io.pin(30, PinMode::Output, PinPullState::None).unwrap();

        pin.reset().unwrap();

        assert_eq!(io.resets(), [30]);
        assert_eq!(io.config(30), None);
    }

    #[test]
    fn test_clone_keeps_configuration_without_touching_hardware() {
        let io = MockIo::new();
        let pin = io.pin(31, PinMode::Input, PinPullState::PullUp).unwrap();
        let configured = io.configures();

        let copy = pin.clone();
        pin.reset().unwrap();

        assert_eq!(io.configures(), configured);
        assert_eq!(copy.address(), 31);
        assert_eq!(copy.config(), PinConfig::new(PinMode::Input, PinPullState::PullUp));
    }

    #[test]
    fn test_embedded_hal_traits_follow_mode() {
        let io = MockIo::new();
        let mut output = io.pin(8, PinMode::Output, PinPullState::None).unwrap();
        let mut input = io.pin(9, PinMode::Input, PinPullState::PullUp).unwrap();

        output.set_high().unwrap();
        assert!(io.level(8));
        output.set_low().unwrap();
        assert!(!io.level(8));

        io.drive(9, true);
        assert_eq!(input.is_high(), Ok(true));
        assert_eq!(input.is_low(), Ok(false));
        assert!(input.set_high().is_err());
    }

    #[test]
    fn test_wait_for_edge() {
        let io = MockIo::new();
        let mut pin = io.pin(40, PinMode::Input, PinPullState::None).unwrap();

        io.drive_after_reads(40, true, 3);
        assert_eq!(block_on(pin.wait_for_rising_edge()), Ok(()));
        assert!(io.level(40));

        io.drive_after_reads(40, false, 2);
        assert_eq!(block_on(pin.wait_for_low()), Ok(()));
    }
}
