mod utils;

pub mod config;
pub mod sensors;
pub mod sonar;

#[cfg(target_os = "espidf")]
mod microcontroller_src;
#[cfg(target_os = "espidf")]
pub mod gpio;

#[cfg(target_os = "espidf")]
pub use microcontroller_src::Microcontroller;
#[cfg(target_os = "espidf")]
pub use utils::esp_clock;
pub use utils::{sensor_io, sonar_error};
