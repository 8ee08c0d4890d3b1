use crate::{
    microcontroller_src::{
        interrupt_driver::InterruptDriver,
        peripherals::{Peripheral, PeripheralError},
    },
    utils::{
        error_text_parser::map_enable_disable_errors,
        sensor_io::EchoLine,
        sonar_error::SonarError,
    },
};
pub use esp_idf_svc::hal::gpio::{InterruptType, Pull};
use esp_idf_svc::hal::gpio::*;
use std::{
    cell::RefCell,
    rc::Rc,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
};

type AtomicInterruptUpdateCode = AtomicU8;

/// Enums the different errors possible when working with the digital in
#[derive(Debug)]
pub enum DigitalInError {
    CannotSetPinAsInput,
    CannotSetPullForPin,
    InvalidPeripheral(PeripheralError),
    InvalidPin,
    StateAlreadySet,
}

/// Driver for receiving digital inputs from a particular Pin
/// - `pin_driver`: An instance of PinDriver that implements AnyIOPin
/// - `interrupt_update_code`: Arc<AtomicInterruptUpdateCode> set by the ISR to indicate how to handle the interrupt
/// - `user_callback`: A closure to execute, outside of the ISR, when the interrupt activates
struct _DigitalIn<'a> {
    pin_driver: PinDriver<'a, AnyIOPin, Input>,
    interrupt_update_code: Arc<AtomicInterruptUpdateCode>,
    user_callback: Box<dyn FnMut() + 'a>,
}

/// Driver for receiving digital inputs from a particular Pin. Clones share the same pin,
/// which lets the [crate::Microcontroller] dispatch its interrupts.
#[derive(Clone)]
pub struct DigitalIn<'a> {
    inner: Rc<RefCell<_DigitalIn<'a>>>,
}

/// After an interrupt is triggered an InterruptUpdate will be set and handled
enum InterruptUpdate {
    ExecAndEnablePin,
    None,
}

impl InterruptUpdate {
    fn get_code(self) -> u8 {
        self as u8
    }

    fn get_atomic_code(self) -> AtomicInterruptUpdateCode {
        AtomicInterruptUpdateCode::new(self.get_code())
    }

    fn from_code(code: u8) -> Self {
        match code {
            x if x == Self::ExecAndEnablePin.get_code() => Self::ExecAndEnablePin,
            _ => Self::None,
        }
    }

    /// Takes the pending update, leaving `InterruptUpdate::None` in its place
    fn take_from(atomic_code: &AtomicInterruptUpdateCode) -> Self {
        InterruptUpdate::from_code(atomic_code.swap(Self::None.get_code(), Ordering::AcqRel))
    }
}

impl<'a> _DigitalIn<'a> {
    /// Create a new _DigitalIn for a Pin with the received pull
    ///
    /// # Errors
    ///
    /// - `DigitalInError::InvalidPeripheral`: If per parameter is not capable of transforming into an AnyIOPin.
    /// - `DigitalInError::CannotSetPinAsInput`: If the per parameter is not capable of supporting input
    /// - `DigitalInError::CannotSetPullForPin`: If the pull cannot be set
    fn new(per: Peripheral, pull: Pull) -> Result<_DigitalIn<'a>, DigitalInError> {
        let gpio = per
            .into_any_io_pin()
            .map_err(DigitalInError::InvalidPeripheral)?;
        let pin_driver = PinDriver::input(gpio).map_err(|_| DigitalInError::CannotSetPinAsInput)?;

        let mut digital_in = _DigitalIn {
            pin_driver,
            interrupt_update_code: Arc::from(InterruptUpdate::None.get_atomic_code()),
            user_callback: Box::new(|| {}),
        };
        digital_in.set_pull(pull)?;
        Ok(digital_in)
    }

    fn set_pull(&mut self, pull_type: Pull) -> Result<(), DigitalInError> {
        self.pin_driver
            .set_pull(pull_type)
            .map_err(|_| DigitalInError::CannotSetPullForPin)
    }

    fn change_interrupt_type(&mut self, interrupt_type: InterruptType) -> Result<(), DigitalInError> {
        self.pin_driver
            .set_interrupt_type(interrupt_type)
            .map_err(|_| DigitalInError::InvalidPin)
    }

    /// Subscribes an ISR that only records an update code, the user callback is run by
    /// `_update_interrupt`.
    fn trigger_on_interrupt<F: FnMut() + 'a>(
        &mut self,
        user_callback: F,
        interrupt_type: InterruptType,
    ) -> Result<(), DigitalInError> {
        self.change_interrupt_type(interrupt_type)?;
        self.user_callback = Box::new(user_callback);

        let interrupt_update_code_ref = self.interrupt_update_code.clone();
        let callback = move || {
            interrupt_update_code_ref.store(
                InterruptUpdate::ExecAndEnablePin.get_code(),
                Ordering::SeqCst,
            );
        };
        unsafe {
            self.pin_driver
                .subscribe(callback)
                .map_err(map_enable_disable_errors)?;
        }
        self.pin_driver
            .enable_interrupt()
            .map_err(map_enable_disable_errors)
    }

    /// Executes the user callback if the ISR fired, then reenables the interrupt since
    /// the driver disables it after each trigger
    fn _update_interrupt(&mut self) -> Result<(), DigitalInError> {
        match InterruptUpdate::take_from(&self.interrupt_update_code) {
            InterruptUpdate::ExecAndEnablePin => {
                (self.user_callback)();
                self.pin_driver
                    .enable_interrupt()
                    .map_err(map_enable_disable_errors)
            }
            InterruptUpdate::None => Ok(()),
        }
    }

    fn get_level(&self) -> Level {
        self.pin_driver.get_level()
    }
}

impl<'a> DigitalIn<'a> {
    /// Create a new DigitalIn for a Pin with the received pull.
    ///
    /// # Arguments
    ///
    /// - `per`: A Peripheral capable of transforming into an AnyIOPin.
    /// - `pull`: Pull set on the pin. Echo lines use `Pull::Down`, buttons to ground `Pull::Up`.
    ///
    /// # Errors
    ///
    /// - `DigitalInError::InvalidPeripheral`: If per parameter is not capable of transforming into an AnyIOPin,
    ///   or pin has already been used for another driver.
    /// - `DigitalInError::CannotSetPinAsInput`: If the per parameter is not capable of supporting input
    /// - `DigitalInError::CannotSetPullForPin`: If the pull cannot be set
    pub(crate) fn new(per: Peripheral, pull: Pull) -> Result<DigitalIn<'a>, DigitalInError> {
        Ok(DigitalIn {
            inner: Rc::new(RefCell::new(_DigitalIn::new(per, pull)?)),
        })
    }

    /// Set the pin Pull either to Pull Up or Down
    pub fn set_pull(&mut self, pull_type: Pull) -> Result<(), DigitalInError> {
        self.inner.borrow_mut().set_pull(pull_type)
    }

    /// Changes the interrupt type of the pin
    ///
    /// # Errors
    ///
    /// - `DigitalInError::InvalidPin`: If the pin driver is unable to support a setting of an interrupt type
    pub fn change_interrupt_type(&mut self, interrupt_type: InterruptType) -> Result<(), DigitalInError> {
        self.inner.borrow_mut().change_interrupt_type(interrupt_type)
    }

    /// Sets a callback that executes when the interrupt type is met. The callback runs on the
    /// next [crate::Microcontroller::update], not inside the ISR, so it may do any work.
    ///
    /// # Errors
    ///
    /// - `DigitalInError::InvalidPin`: If the interrupt cannot be set or enabled
    /// - `DigitalInError::StateAlreadySet`: If the ISR service is in an invalid state
    pub fn trigger_on_interrupt<F: FnMut() + 'a>(
        &mut self,
        user_callback: F,
        interrupt_type: InterruptType,
    ) -> Result<(), DigitalInError> {
        self.inner
            .borrow_mut()
            .trigger_on_interrupt(user_callback, interrupt_type)
    }

    pub fn get_level(&self) -> Level {
        self.inner.borrow().get_level()
    }

    pub fn is_high(&self) -> bool {
        self.get_level() == Level::High
    }

    pub fn is_low(&self) -> bool {
        self.get_level() == Level::Low
    }
}

impl InterruptDriver for DigitalIn<'_> {
    fn update_interrupt(&mut self) -> Result<(), SonarError> {
        self.inner.borrow_mut()._update_interrupt()?;
        Ok(())
    }
}

impl EchoLine for DigitalIn<'_> {
    fn is_high(&self) -> bool {
        DigitalIn::is_high(self)
    }
}
