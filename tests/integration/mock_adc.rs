//! Scripted ADC for integration tests.
//!
//! Replays a fixed sequence of conversions per channel and records every
//! channel it was asked to sample.

use fived_hw::app::ports::AnalogPort;
use fived_hw::error::SensorError;
use std::collections::{HashMap, VecDeque};

pub struct ScriptedAdc {
    scripts: HashMap<u8, VecDeque<u16>>,
    pub reads: Vec<u8>,
}

#[allow(dead_code)]
impl ScriptedAdc {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            reads: Vec::new(),
        }
    }

    /// Queue `values` on `channel`; a drained channel fails the read.
    pub fn script(mut self, channel: u8, values: &[u16]) -> Self {
        self.scripts
            .entry(channel)
            .or_default()
            .extend(values.iter().copied());
        self
    }

    pub fn remaining(&self, channel: u8) -> usize {
        self.scripts.get(&channel).map_or(0, VecDeque::len)
    }
}

impl AnalogPort for ScriptedAdc {
    fn read_raw(&mut self, channel: u8) -> Result<u16, SensorError> {
        self.reads.push(channel);
        self.scripts
            .get_mut(&channel)
            .and_then(VecDeque::pop_front)
            .ok_or(SensorError::AdcReadFailed)
    }
}
