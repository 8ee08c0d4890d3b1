use crate::utils::sonar_error::SonarError;

/// Driver whose ISR leaves work to be finished outside of the interrupt context
pub trait InterruptDriver {
    fn update_interrupt(&mut self) -> Result<(), SonarError>;
}
