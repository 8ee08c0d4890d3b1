use std::{fmt, io};

#[cfg(target_os = "espidf")]
use crate::gpio::{DigitalInError, DigitalOutError};

/// The line a scripted test fault is reported on
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Trigger,
    StopButton,
}

/// Enums every error that can stop the sonar
#[derive(Debug)]
pub enum SonarError {
    #[cfg(target_os = "espidf")]
    DigitalInError(DigitalInError),
    #[cfg(target_os = "espidf")]
    DigitalOutError(DigitalOutError),
    PinAssignedTwice(usize),
    #[cfg(test)]
    LineUnavailable(Line),
    Console(io::ErrorKind),
}

impl fmt::Display for SonarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(target_os = "espidf")]
            SonarError::DigitalInError(err) => write!(f, "digital input failed: {err:?}"),
            #[cfg(target_os = "espidf")]
            SonarError::DigitalOutError(err) => write!(f, "digital output failed: {err:?}"),
            SonarError::PinAssignedTwice(pin) => write!(f, "GPIO{pin} is assigned to more than one role"),
            #[cfg(test)]
            SonarError::LineUnavailable(line) => write!(f, "{line:?} line is unavailable"),
            SonarError::Console(kind) => write!(f, "console write failed: {kind}"),
        }
    }
}

impl std::error::Error for SonarError {}

impl From<io::Error> for SonarError {
    fn from(value: io::Error) -> Self {
        SonarError::Console(value.kind())
    }
}

#[cfg(target_os = "espidf")]
impl From<DigitalInError> for SonarError {
    fn from(value: DigitalInError) -> Self {
        SonarError::DigitalInError(value)
    }
}

#[cfg(target_os = "espidf")]
impl From<DigitalOutError> for SonarError {
    fn from(value: DigitalOutError) -> Self {
        SonarError::DigitalOutError(value)
    }
}
