//! Polls an HC-SR04 wired to GPIO5 (trigger) and GPIO6 (echo) and prints every
//! reading. Pressing the BOOT button (GPIO9) stops the loop and releases the pins.

#[cfg(target_os = "espidf")]
fn main() {
    if let Err(err) = sonar::run(edukit_sonar::config::SonarConfig::default()) {
        log::error!("sonar stopped: {err}");
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("edukit_sonar drives ESP32 GPIOs, build it with --target riscv32imac-esp-espidf");
    std::process::exit(1);
}

#[cfg(target_os = "espidf")]
mod sonar {
    use edukit_sonar::{
        config::SonarConfig,
        gpio::{InterruptType, Pull},
        sensors::HCSR04,
        sonar::{Sonar, StopSignal},
        sonar_error::SonarError,
        Microcontroller,
    };

    pub fn run(config: SonarConfig) -> Result<(), SonarError> {
        config.validate()?;
        let mut micro = Microcontroller::new();

        let stop = StopSignal::new();
        let mut stop_button = micro.set_pin_as_digital_in(config.stop_button_pin, Pull::Up)?;
        let isr_stop = stop.clone();
        stop_button.trigger_on_interrupt(move || isr_stop.request_stop(), InterruptType::NegEdge)?;

        let trig = micro.set_pin_as_digital_out(config.trigger_pin)?;
        let echo = micro.set_pin_as_digital_in(config.echo_pin, Pull::Down)?;
        let sensor = HCSR04::new(trig, echo, micro.clock())?;

        let stats = Sonar::new(sensor, stop).run(&mut std::io::stdout(), || micro.update())?;
        log::info!(
            "{} distances, {} time outs, {} out of range",
            stats.distances,
            stats.timeouts,
            stats.out_of_range
        );
        Ok(())
    }
}
