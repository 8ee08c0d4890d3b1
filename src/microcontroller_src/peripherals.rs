use std::mem;
use esp_idf_svc::hal::gpio::*;

const PIN_COUNT: usize = 24;
const DIGITAL_PINS_BOUNDS: (usize, usize) = (0, 23);
const MISSING_PIN: usize = 14;

#[derive(Debug)]
pub enum PeripheralError {
    NotAPin,
    AlreadyTaken(usize),
}

/// A pin of the esp32 that has not been handed to a driver yet
#[derive(Default)]
pub enum Peripheral {
    Pin(u8),
    #[default]
    None,
}

impl Peripheral {
    fn take(&mut self) -> Peripheral {
        mem::take(self)
    }

    /// If the Peripheral is a Pin returns the corresponding AnyIoPin.
    /// If not it returns PeripheralError::NotAPin
    pub fn into_any_io_pin(self) -> Result<AnyIOPin, PeripheralError> {
        let Peripheral::Pin(pin_num) = self else {
            return Err(PeripheralError::NotAPin);
        };
        // SAFETY: every pin number lives in a single Peripheral slot, which is emptied on take
        let pin = unsafe {
            match pin_num {
                0 => Gpio0::new().downgrade(),
                1 => Gpio1::new().downgrade(),
                2 => Gpio2::new().downgrade(),
                3 => Gpio3::new().downgrade(),
                4 => Gpio4::new().downgrade(),
                5 => Gpio5::new().downgrade(),
                6 => Gpio6::new().downgrade(),
                7 => Gpio7::new().downgrade(),
                8 => Gpio8::new().downgrade(),
                9 => Gpio9::new().downgrade(),
                10 => Gpio10::new().downgrade(),
                11 => Gpio11::new().downgrade(),
                12 => Gpio12::new().downgrade(),
                13 => Gpio13::new().downgrade(),
                15 => Gpio15::new().downgrade(),
                16 => Gpio16::new().downgrade(),
                17 => Gpio17::new().downgrade(),
                18 => Gpio18::new().downgrade(),
                19 => Gpio19::new().downgrade(),
                20 => Gpio20::new().downgrade(),
                21 => Gpio21::new().downgrade(),
                22 => Gpio22::new().downgrade(),
                23 => Gpio23::new().downgrade(),
                _ => return Err(PeripheralError::NotAPin),
            }
        };
        Ok(pin)
    }
}

/// Digital pins of the esp32C6. Each pin is handed out once, later gets of the same pin
/// fail with `PeripheralError::AlreadyTaken`. GPIO14 is not bonded out.
pub struct Peripherals {
    pins: [Peripheral; PIN_COUNT],
}

impl Peripherals {
    pub fn new() -> Peripherals {
        let pins: [Peripheral; PIN_COUNT] = std::array::from_fn(|pin_num| match pin_num {
            MISSING_PIN => Peripheral::None,
            _ => Peripheral::Pin(pin_num as u8),
        });
        Peripherals { pins }
    }

    /// Takes the pin if it is a digital pin and it was not taken before
    pub fn get_digital_pin(&mut self, pin_num: usize) -> Result<Peripheral, PeripheralError> {
        if !(DIGITAL_PINS_BOUNDS.0..=DIGITAL_PINS_BOUNDS.1).contains(&pin_num) || pin_num == MISSING_PIN {
            return Err(PeripheralError::NotAPin);
        }
        match self.pins[pin_num].take() {
            Peripheral::None => Err(PeripheralError::AlreadyTaken(pin_num)),
            pin => Ok(pin),
        }
    }
}

impl Default for Peripherals {
    fn default() -> Self {
        Self::new()
    }
}
