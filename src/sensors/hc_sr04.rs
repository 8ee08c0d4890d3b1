use std::fmt;

use crate::utils::{
    sensor_io::{Clock, EchoLine, TriggerLine},
    sonar_error::SonarError,
};

const SOUND_SPEED_M_S: f64 = 340.0;
const SOUND_SPEED_CM_US: f64 = SOUND_SPEED_M_S * 100.0 / 1_000_000.0;

/// Time the trigger is held low before each ping so the burst starts from a clean signal
pub const TRIGGER_SETTLE_MS: u32 = 100;
/// Width of the trigger pulse that starts the sonic burst
pub const TRIGGER_PULSE_US: u32 = 10;
/// Longest echo accepted, anything at or above it is reported as a time out
pub const ECHO_TIMEOUT_US: i64 = 17_460;
/// Furthest distance reported as valid
pub const MAX_DISTANCE_CM: f64 = 300.0;

/// Outcome of a single ping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Distance(f64),
    TimeOut,
    OutOfRange,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Distance(cm) => write!(f, "Distance : {cm:.6} cm"),
            Reading::TimeOut => write!(f, "time out"),
            Reading::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Timestamps, in microseconds, of the rising and falling edge of the echo line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoPulse {
    pub start_us: i64,
    pub end_us: i64,
}

impl EchoPulse {
    pub fn duration_us(&self) -> i64 {
        self.end_us - self.start_us
    }
}

/// Simple abstraction of the HCSR04 that facilitates its handling
pub struct HCSR04<T: TriggerLine, E: EchoLine, C: Clock> {
    trig: T,
    echo: E,
    clock: C,
}

impl<T: TriggerLine, E: EchoLine, C: Clock> HCSR04<T, E, C> {
    /// Creates a new HCSR04, leaving the trigger low
    ///
    /// # Errors
    ///
    /// Any error reported by the trigger line while driving it low.
    pub fn new(mut trig: T, echo: E, clock: C) -> Result<Self, SonarError> {
        trig.set_low()?;
        Ok(HCSR04 { trig, echo, clock })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Sends the sonic burst.
    ///
    /// First the trigger is set low for a while to get a clean signal, then
    /// it is set high for 10 micro-seconds.
    ///
    /// # Returns
    ///
    /// The time at which the trigger went low again.
    pub fn fire_trigger(&mut self) -> Result<i64, SonarError> {
        self.trig.set_low()?;
        self.clock.delay_ms(TRIGGER_SETTLE_MS);
        self.trig.set_high()?;
        self.clock.delay_us(TRIGGER_PULSE_US);
        self.trig.set_low()?;
        Ok(self.clock.now_us())
    }

    /// Busy waits until the echo line reaches `high`, giving up once `ECHO_TIMEOUT_US`
    /// have passed since `since_us`.
    fn wait_for_echo_level(&self, high: bool, since_us: i64) -> Option<i64> {
        loop {
            let now = self.clock.now_us();
            if self.echo.is_high() == high {
                return Some(now);
            }
            if now - since_us >= ECHO_TIMEOUT_US {
                return None;
            }
        }
    }

    /// Fires the trigger and times the echo.
    ///
    /// # Returns
    ///
    /// `None` if either edge of the echo did not arrive in time.
    pub fn measure_echo(&mut self) -> Result<Option<EchoPulse>, SonarError> {
        let fired_at = self.fire_trigger()?;

        let Some(start_us) = self.wait_for_echo_level(true, fired_at) else {
            log::debug!("echo never rose");
            return Ok(None);
        };
        let Some(end_us) = self.wait_for_echo_level(false, start_us) else {
            log::debug!("echo stayed high past {ECHO_TIMEOUT_US}us");
            return Ok(None);
        };

        let pulse = EchoPulse { start_us, end_us };
        log::debug!("echo pulse of {}us", pulse.duration_us());
        Ok(Some(pulse))
    }

    /// Pings once and classifies the echo
    pub fn get_reading(&mut self) -> Result<Reading, SonarError> {
        Ok(match self.measure_echo()? {
            Some(pulse) => classify_pulse(pulse.duration_us()),
            None => Reading::TimeOut,
        })
    }

    /// Returns the distance of the object in front of the sensor in centimeters
    ///
    /// # Returns
    ///
    /// `None` when the ping timed out or the object was out of range.
    pub fn get_distance(&mut self) -> Result<Option<f64>, SonarError> {
        Ok(match self.get_reading()? {
            Reading::Distance(cm) => Some(cm),
            _ => None,
        })
    }

    /// Leaves the trigger low and hands back the lines and the clock
    pub fn release(mut self) -> (T, E, C) {
        if let Err(err) = self.trig.set_low() {
            log::warn!("could not leave the trigger low: {err}");
        }
        (self.trig, self.echo, self.clock)
    }
}

/// Converts the echo duration to centimeters. We divide by 2 because if not we get
/// the distance of the roundtrip.
pub fn distance_from_duration(duration_us: i64) -> f64 {
    SOUND_SPEED_CM_US * duration_us as f64 / 2.0
}

pub fn round_to_millimeter(cm: f64) -> f64 {
    (cm * 1000.0).round() / 1000.0
}

/// Time outs are checked before the range, so a pulse at or above
/// `ECHO_TIMEOUT_US` is never reported as out of range.
pub fn classify_pulse(duration_us: i64) -> Reading {
    if duration_us >= ECHO_TIMEOUT_US {
        return Reading::TimeOut;
    }
    classify_distance(distance_from_duration(duration_us))
}

/// Rejects distances above `MAX_DISTANCE_CM` and empty echoes, rounding the rest
pub fn classify_distance(cm: f64) -> Reading {
    if cm > MAX_DISTANCE_CM || cm <= 0.0 {
        return Reading::OutOfRange;
    }
    Reading::Distance(round_to_millimeter(cm))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::{
        fake_bench::{Bench, Echo},
        sonar_error::Line,
    };

    #[test]
    fn test0_duration_converts_at_17000_cm_per_second() {
        assert!((distance_from_duration(1_000) - 17.0).abs() < 1e-9);
        assert!((distance_from_duration(5_882) - 99.994).abs() < 1e-9);
    }

    #[test]
    fn test1_classify_rejects_timeouts_before_range() {
        assert_eq!(classify_pulse(ECHO_TIMEOUT_US), Reading::TimeOut);
        assert_eq!(classify_pulse(20_000), Reading::TimeOut);
        assert_eq!(classify_pulse(ECHO_TIMEOUT_US - 1), Reading::Distance(296.803));
    }

    #[test]
    fn test2_classify_rejects_zero_and_negative_distances() {
        assert_eq!(classify_pulse(0), Reading::OutOfRange);
        assert_eq!(classify_pulse(-3), Reading::OutOfRange);
    }

    #[test]
    fn test3_distances_are_rounded_to_three_decimals() {
        assert_eq!(classify_pulse(1_234), Reading::Distance(20.978));
        assert_eq!(round_to_millimeter(12.34567), 12.346);
    }

    #[test]
    fn test4_reading_lines_match_console_format() {
        assert_eq!(Reading::Distance(20.978).to_string(), "Distance : 20.978000 cm");
        assert_eq!(Reading::TimeOut.to_string(), "time out");
        assert_eq!(Reading::OutOfRange.to_string(), "out of range");
    }

    #[test]
    fn test5_new_leaves_trigger_low() {
        let bench = Bench::new(vec![]);
        let _sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        assert!(!bench.trigger_is_high());
        assert_eq!(bench.pulses(), vec![]);
    }

    #[test]
    fn test6_trigger_pulse_is_ten_micro_seconds_after_settling() {
        let bench = Bench::new(vec![Echo::After { delay_us: 400, width_us: 1_000 }]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        sensor.measure_echo().unwrap();

        let pulses = bench.pulses();
        assert_eq!(pulses.len(), 1);
        let (rose_at, fell_at) = pulses[0];
        assert_eq!(fell_at - rose_at, TRIGGER_PULSE_US as i64);
        assert!(rose_at >= TRIGGER_SETTLE_MS as i64 * 1000);
    }

    #[test]
    fn test7_echo_width_is_measured() {
        let bench = Bench::new(vec![Echo::After { delay_us: 400, width_us: 1_000 }]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        let pulse = sensor.measure_echo().unwrap().unwrap();
        assert_eq!(pulse.duration_us(), 1_000);
    }

    #[test]
    fn test8_missing_echo_times_out_instead_of_hanging() {
        let bench = Bench::new(vec![Echo::Never]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        assert_eq!(sensor.get_reading().unwrap(), Reading::TimeOut);
    }

    #[test]
    fn test9_stuck_echo_times_out_instead_of_hanging() {
        let bench = Bench::new(vec![Echo::After { delay_us: 100, width_us: 1_000_000 }]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        assert_eq!(sensor.measure_echo().unwrap(), None);
        assert_eq!(sensor.get_distance().unwrap(), None);
    }

    #[test]
    fn test10_get_distance_returns_valid_readings() {
        let bench = Bench::new(vec![Echo::After { delay_us: 250, width_us: 2_000 }]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        assert_eq!(sensor.get_distance().unwrap(), Some(34.0));
    }

    #[test]
    fn test11_trigger_failure_is_propagated() {
        let bench = Bench::new(vec![Echo::Never]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        bench.break_trigger();
        assert!(matches!(
            sensor.get_reading(),
            Err(SonarError::LineUnavailable(Line::Trigger))
        ));
    }

    #[test]
    fn test12_release_leaves_trigger_low() {
        let bench = Bench::new(vec![]);
        let mut sensor = HCSR04::new(bench.trigger(), bench.echo(), bench.clock()).unwrap();
        sensor.trig.set_high().unwrap();
        let _ = sensor.release();
        assert!(!bench.trigger_is_high());
    }

    #[test]
    fn test13_distances_above_300_cm_are_out_of_range() {
        assert_eq!(classify_distance(300.0), Reading::Distance(300.0));
        assert_eq!(classify_distance(300.001), Reading::OutOfRange);
        assert_eq!(classify_distance(450.0), Reading::OutOfRange);
        assert_eq!(classify_distance(0.0), Reading::OutOfRange);
    }
}
