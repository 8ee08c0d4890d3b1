use crate::utils::sonar_error::SonarError;

/// Output line that fires the ultrasonic burst
pub trait TriggerLine {
    fn set_high(&mut self) -> Result<(), SonarError>;

    fn set_low(&mut self) -> Result<(), SonarError>;
}

/// Input line that stays high while the echo is travelling
pub trait EchoLine {
    fn is_high(&self) -> bool;
}

/// Time source used to time the echo.
///
/// `now_us` must be monotonic. `delay_us` is expected to busy wait, while
/// `delay_ms` may yield to the scheduler.
pub trait Clock {
    fn now_us(&self) -> i64;

    fn delay_us(&self, micros: u32);

    fn delay_ms(&self, millis: u32);
}
