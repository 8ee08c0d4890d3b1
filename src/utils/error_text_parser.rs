use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_STATE};

use crate::gpio::DigitalInError;

/// Maps the errors of subscribing or enabling a pin interrupt. `ESP_ERR_INVALID_STATE`
/// means the GPIO ISR service was already in a state that rejects the request.
pub fn map_enable_disable_errors(err: EspError) -> DigitalInError {
    match err.code() {
        ESP_ERR_INVALID_STATE => DigitalInError::StateAlreadySet,
        _ => DigitalInError::InvalidPin,
    }
}
