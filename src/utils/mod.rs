pub mod sensor_io;
pub mod sonar_error;

#[cfg(target_os = "espidf")]
pub mod error_text_parser;
#[cfg(target_os = "espidf")]
pub mod esp_clock;

#[cfg(test)]
pub(crate) mod fake_bench;
