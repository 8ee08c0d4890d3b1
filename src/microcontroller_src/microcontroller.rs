use crate::{
    gpio::{DigitalIn, DigitalInError, DigitalOut, DigitalOutError, Pull},
    microcontroller_src::{interrupt_driver::InterruptDriver, peripherals::Peripherals},
    utils::{esp_clock::EspClock, sonar_error::SonarError},
};

/// Primary abstraction for interacting with the microcontroller, providing access to the pins
/// and dispatching the work their interrupts leave pending.
///
/// - `peripherals`: An instance of `Peripherals`, representing the pins not yet handed out.
/// - `interrupt_drivers`: Drivers whose interrupts are finished by `update`.
pub struct Microcontroller<'a> {
    peripherals: Peripherals,
    interrupt_drivers: Vec<Box<dyn InterruptDriver + 'a>>,
}

impl<'a> Microcontroller<'a> {
    /// Creates a new Microcontroller instance, initializing the ESP-IDF logger
    pub fn new() -> Self {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();

        Microcontroller {
            peripherals: Peripherals::new(),
            interrupt_drivers: Vec::new(),
        }
    }

    /// Creates a DigitalIn on the ESP pin with number 'pin_num' to read digital inputs.
    ///
    /// # Arguments
    ///
    /// - `pin_num`: The number of the pin on the microcontroller to configure as a digital input.
    /// - `pull`: The pull of the pin.
    ///
    /// # Errors
    ///
    /// - `DigitalInError::InvalidPeripheral`: If the pin does not exist or was already taken.
    /// - `DigitalInError::CannotSetPinAsInput`, `DigitalInError::CannotSetPullForPin`: If the driver rejects the pin.
    pub fn set_pin_as_digital_in(&mut self, pin_num: usize, pull: Pull) -> Result<DigitalIn<'a>, DigitalInError> {
        let pin_peripheral = self
            .peripherals
            .get_digital_pin(pin_num)
            .map_err(DigitalInError::InvalidPeripheral)?;
        let dgin = DigitalIn::new(pin_peripheral, pull)?;
        self.interrupt_drivers.push(Box::new(dgin.clone()));
        Ok(dgin)
    }

    /// Creates a DigitalOut on the ESP pin with number 'pin_num' to write digital outputs.
    ///
    /// # Errors
    ///
    /// - `DigitalOutError::InvalidPeripheral`: If the pin does not exist or was already taken.
    /// - `DigitalOutError::CannotSetPinAsOutput`: If the driver rejects the pin.
    pub fn set_pin_as_digital_out(&mut self, pin_num: usize) -> Result<DigitalOut<'a>, DigitalOutError> {
        let pin_peripheral = self
            .peripherals
            .get_digital_pin(pin_num)
            .map_err(DigitalOutError::InvalidPeripheral)?;
        DigitalOut::new(pin_peripheral)
    }

    /// Runs the work left pending by every interrupt fired since the last update
    pub fn update(&mut self) -> Result<(), SonarError> {
        for driver in &mut self.interrupt_drivers {
            driver.update_interrupt()?
        }
        Ok(())
    }

    pub fn clock(&self) -> EspClock {
        EspClock
    }
}

impl Default for Microcontroller<'_> {
    fn default() -> Self {
        Self::new()
    }
}
