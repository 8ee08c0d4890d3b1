use crate::utils::sonar_error::SonarError;

const DEFAULT_TRIGGER_PIN: usize = 5;
const DEFAULT_ECHO_PIN: usize = 6;
/// BOOT button on the ESP32-C6 devkits
const DEFAULT_STOP_BUTTON_PIN: usize = 9;

/// GPIO assignment of the sonar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SonarConfig {
    pub trigger_pin: usize,
    pub echo_pin: usize,
    pub stop_button_pin: usize,
}

impl Default for SonarConfig {
    fn default() -> Self {
        SonarConfig {
            trigger_pin: DEFAULT_TRIGGER_PIN,
            echo_pin: DEFAULT_ECHO_PIN,
            stop_button_pin: DEFAULT_STOP_BUTTON_PIN,
        }
    }
}

impl SonarConfig {
    pub fn new(trigger_pin: usize, echo_pin: usize, stop_button_pin: usize) -> Self {
        SonarConfig { trigger_pin, echo_pin, stop_button_pin }
    }

    /// Checks that every role got its own pin
    ///
    /// # Errors
    ///
    /// - `SonarError::PinAssignedTwice`: with the first pin found on two roles
    pub fn validate(&self) -> Result<(), SonarError> {
        if self.trigger_pin == self.echo_pin || self.trigger_pin == self.stop_button_pin {
            return Err(SonarError::PinAssignedTwice(self.trigger_pin));
        }
        if self.echo_pin == self.stop_button_pin {
            return Err(SonarError::PinAssignedTwice(self.echo_pin));
        }
        Ok(())
    }
}
