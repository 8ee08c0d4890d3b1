use esp_idf_svc::{
    hal::delay::{Delay, FreeRtos},
    sys::esp_timer_get_time,
};

use super::sensor_io::Clock;

/// Clock backed by the ESP high resolution timer
#[derive(Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    fn now_us(&self) -> i64 {
        unsafe { esp_timer_get_time() }
    }

    /// Busy waits, short enough delays must not yield to FreeRTOS
    fn delay_us(&self, micros: u32) {
        Delay::new_default().delay_us(micros);
    }

    fn delay_ms(&self, millis: u32) {
        FreeRtos::delay_ms(millis);
    }
}
