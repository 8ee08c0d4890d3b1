//! Scripted trigger, echo and clock sharing one simulated timeline.
//!
//! Every call to `now_us` advances the timeline one micro-second, so the busy
//! waits of the sensor terminate the same way they do on hardware.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::{
    sensor_io::{Clock, EchoLine, TriggerLine},
    sonar_error::{Line, SonarError},
};

/// How the echo line answers one ping
#[derive(Debug, Clone, Copy)]
pub enum Echo {
    After { delay_us: i64, width_us: i64 },
    Never,
}

#[derive(Default)]
struct BenchState {
    now_us: i64,
    trigger_high: bool,
    trigger_rose_at: i64,
    trigger_broken: bool,
    pulses: Vec<(i64, i64)>,
    script: VecDeque<Echo>,
    current: Option<(i64, Echo)>,
}

#[derive(Clone)]
pub struct Bench {
    state: Rc<RefCell<BenchState>>,
}

pub struct FakeTrigger {
    state: Rc<RefCell<BenchState>>,
}

pub struct FakeEcho {
    state: Rc<RefCell<BenchState>>,
}

pub struct FakeClock {
    state: Rc<RefCell<BenchState>>,
}

impl Bench {
    pub fn new(script: Vec<Echo>) -> Self {
        let state = BenchState {
            script: script.into(),
            ..Default::default()
        };
        Bench { state: Rc::new(RefCell::new(state)) }
    }

    pub fn trigger(&self) -> FakeTrigger {
        FakeTrigger { state: self.state.clone() }
    }

    pub fn echo(&self) -> FakeEcho {
        FakeEcho { state: self.state.clone() }
    }

    pub fn clock(&self) -> FakeClock {
        FakeClock { state: self.state.clone() }
    }

    pub fn trigger_is_high(&self) -> bool {
        self.state.borrow().trigger_high
    }

    /// Rising and falling edge times of every trigger pulse so far
    pub fn pulses(&self) -> Vec<(i64, i64)> {
        self.state.borrow().pulses.clone()
    }

    pub fn break_trigger(&self) {
        self.state.borrow_mut().trigger_broken = true;
    }

    pub fn now_us(&self) -> i64 {
        self.state.borrow().now_us
    }
}

impl FakeTrigger {
    fn set(&mut self, high: bool) -> Result<(), SonarError> {
        let mut state = self.state.borrow_mut();
        if state.trigger_broken {
            return Err(SonarError::LineUnavailable(Line::Trigger));
        }
        let now = state.now_us;
        match (state.trigger_high, high) {
            (false, true) => state.trigger_rose_at = now,
            (true, false) => {
                let rose_at = state.trigger_rose_at;
                state.pulses.push((rose_at, now));
                let echo = state.script.pop_front().unwrap_or(Echo::Never);
                state.current = Some((now, echo));
            }
            _ => {}
        }
        state.trigger_high = high;
        Ok(())
    }
}

impl TriggerLine for FakeTrigger {
    fn set_high(&mut self) -> Result<(), SonarError> {
        self.set(true)
    }

    fn set_low(&mut self) -> Result<(), SonarError> {
        self.set(false)
    }
}

impl EchoLine for FakeEcho {
    fn is_high(&self) -> bool {
        let state = self.state.borrow();
        match state.current {
            Some((fired_at, Echo::After { delay_us, width_us })) => {
                let rise = fired_at + delay_us;
                (rise..rise + width_us).contains(&state.now_us)
            }
            _ => false,
        }
    }
}

impl Clock for FakeClock {
    fn now_us(&self) -> i64 {
        let mut state = self.state.borrow_mut();
        let now = state.now_us;
        state.now_us += 1;
        now
    }

    fn delay_us(&self, micros: u32) {
        self.state.borrow_mut().now_us += micros as i64;
    }

    fn delay_ms(&self, millis: u32) {
        self.state.borrow_mut().now_us += millis as i64 * 1000;
    }
}
