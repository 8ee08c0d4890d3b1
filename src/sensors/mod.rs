mod hc_sr04;

pub use hc_sr04::*;
