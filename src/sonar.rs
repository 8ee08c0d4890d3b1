use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    sensors::{Reading, HCSR04},
    utils::{
        sensor_io::{Clock, EchoLine, TriggerLine},
        sonar_error::SonarError,
    },
};

pub const START_BANNER: &str =
    "-----------------------------------------------------------------sonar start";
pub const STOP_MESSAGE: &str = "You pressed the stop button!";
/// Time the lines are given to settle after being configured
pub const STARTUP_DELAY_MS: u32 = 500;

/// Flag shared between the stop interrupt and the poll loop
#[derive(Clone, Default)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe to call from an ISR
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Counters of the readings taken before the loop stopped
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub distances: u32,
    pub timeouts: u32,
    pub out_of_range: u32,
}

impl PollStats {
    fn record(&mut self, reading: &Reading) {
        match reading {
            Reading::Distance(_) => self.distances = self.distances.saturating_add(1),
            Reading::TimeOut => self.timeouts = self.timeouts.saturating_add(1),
            Reading::OutOfRange => self.out_of_range = self.out_of_range.saturating_add(1),
        }
    }
}

/// Polls an HCSR04 and prints every reading until a stop is requested
pub struct Sonar<T: TriggerLine, E: EchoLine, C: Clock> {
    sensor: HCSR04<T, E, C>,
    stop: StopSignal,
}

impl<T: TriggerLine, E: EchoLine, C: Clock> Sonar<T, E, C> {
    pub fn new(sensor: HCSR04<T, E, C>, stop: StopSignal) -> Self {
        Sonar { sensor, stop }
    }

    /// Runs the poll loop, writing one line per reading to `out`.
    ///
    /// `before_ping` is called at the start of every iteration, before the stop
    /// check, so a stop requested from it ends the loop without another ping.
    /// Time outs and out of range readings are printed and skipped.
    ///
    /// The sensor is released, with its trigger low, on every exit path.
    ///
    /// # Errors
    ///
    /// The first error of the sensor, of `before_ping` or of `out`.
    pub fn run<W, F>(self, out: &mut W, before_ping: F) -> Result<PollStats, SonarError>
    where
        W: Write,
        F: FnMut() -> Result<(), SonarError>,
    {
        let Sonar { mut sensor, stop } = self;
        let result = poll(&mut sensor, &stop, out, before_ping);
        drop(sensor.release());

        match &result {
            Ok(stats) => log::info!("sonar stopped: {stats:?}"),
            Err(err) => log::warn!("sonar aborted, lines released: {err}"),
        }
        result
    }
}

fn poll<T, E, C, W, F>(
    sensor: &mut HCSR04<T, E, C>,
    stop: &StopSignal,
    out: &mut W,
    mut before_ping: F,
) -> Result<PollStats, SonarError>
where
    T: TriggerLine,
    E: EchoLine,
    C: Clock,
    W: Write,
    F: FnMut() -> Result<(), SonarError>,
{
    let mut stats = PollStats::default();

    sensor.clock().delay_ms(STARTUP_DELAY_MS);
    writeln!(out, "{START_BANNER}")?;
    log::info!("sonar started");

    loop {
        before_ping()?;
        if stop.is_stop_requested() {
            writeln!(out, "{STOP_MESSAGE}")?;
            return Ok(stats);
        }

        let reading = sensor.get_reading()?;
        stats.record(&reading);
        writeln!(out, "{reading}")?;
        out.flush()?;
    }
}
