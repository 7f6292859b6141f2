//! Simulated ADC for host runs and tests.
//!
//! Each channel holds its latest conversion in an atomic, the same way the
//! firmware's ISR-fed caches work: an injector (test, replay thread) stores
//! values through `&self` while the sampling path reads them.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::app::ports::AnalogPort;
use crate::error::SensorError;

/// Analog inputs on the largest supported board.
pub const ANALOG_CHANNELS: usize = 16;

pub struct SimulatedAdc {
    channels: [AtomicU16; ANALOG_CHANNELS],
    failed: AtomicBool,
}

impl SimulatedAdc {
    /// Every channel starts at `initial`.
    pub fn new(initial: u16) -> Self {
        Self {
            channels: core::array::from_fn(|_| AtomicU16::new(initial)),
            failed: AtomicBool::new(false),
        }
    }

    /// Inject the next conversion result for `channel`.  Out-of-range
    /// channels are ignored.
    pub fn set(&self, channel: u8, raw: u16) {
        if let Some(c) = self.channels.get(usize::from(channel)) {
            c.store(raw, Ordering::Relaxed);
        }
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_failed(&self, failed: bool) {
        self.failed.store(failed, Ordering::Relaxed);
    }
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AnalogPort for SimulatedAdc {
    fn read_raw(&mut self, channel: u8) -> Result<u16, SensorError> {
        if self.failed.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        self.channels
            .get(usize::from(channel))
            .map(|c| c.load(Ordering::Relaxed))
            .ok_or(SensorError::AdcReadFailed)
    }
}
