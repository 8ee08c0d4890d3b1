use crate::{
    microcontroller_src::peripherals::{Peripheral, PeripheralError},
    utils::{sensor_io::TriggerLine, sonar_error::SonarError},
};
use esp_idf_svc::hal::gpio::*;

/// Enums the different errors possible when working with the digital out
#[derive(Debug)]
pub enum DigitalOutError {
    CannotSetPinAsOutput,
    InvalidPin,
    InvalidPeripheral(PeripheralError),
}

/// Driver to handle a digital output for a particular Pin.
/// Dropping it resets the pin, which is how the sonar cleans up its trigger.
pub struct DigitalOut<'a> {
    pin_driver: PinDriver<'a, AnyIOPin, Output>,
}

impl<'a> DigitalOut<'a> {
    /// Creates a new `DigitalOut` for a specified pin.
    ///
    /// # Arguments
    ///
    /// - `per`: A Peripheral that can be transformed into an AnyIOPin.
    ///
    /// # Returns
    ///
    /// A `Result` containing the new `DigitalOut` instance, or a `DigitalOutError` if the initialization fails.
    ///
    /// # Errors
    ///
    /// - `DigitalOutError::InvalidPeripheral`: If the peripheral cannot be converted into an AnyIOPin.
    /// - `DigitalOutError::CannotSetPinAsOutput`: If the pin cannot be set as an output.
    pub(crate) fn new(per: Peripheral) -> Result<DigitalOut<'a>, DigitalOutError> {
        let gpio = per
            .into_any_io_pin()
            .map_err(DigitalOutError::InvalidPeripheral)?;
        let pin_driver =
            PinDriver::output(gpio).map_err(|_| DigitalOutError::CannotSetPinAsOutput)?;

        Ok(DigitalOut { pin_driver })
    }

    /// Sets the pin level to either `High` or `Low`.
    ///
    /// # Errors
    ///
    /// - `DigitalOutError::InvalidPin`: If the pin level cannot be set.
    pub fn set_level(&mut self, level: Level) -> Result<(), DigitalOutError> {
        self.pin_driver
            .set_level(level)
            .map_err(|_| DigitalOutError::InvalidPin)
    }

    /// Gets the current level of the pin.
    pub fn get_level(&self) -> Level {
        if self.pin_driver.is_set_high() {
            Level::High
        } else {
            Level::Low
        }
    }

    pub fn set_high(&mut self) -> Result<(), DigitalOutError> {
        self.set_level(Level::High)
    }

    pub fn set_low(&mut self) -> Result<(), DigitalOutError> {
        self.set_level(Level::Low)
    }
}

impl TriggerLine for DigitalOut<'_> {
    fn set_high(&mut self) -> Result<(), SonarError> {
        DigitalOut::set_high(self).map_err(SonarError::from)
    }

    fn set_low(&mut self) -> Result<(), SonarError> {
        DigitalOut::set_low(self).map_err(SonarError::from)
    }
}
