//! Sensor subsystem: sample averaging and the extruder thermometers.
//!
//! Raw ADC readings are noisy, so every temperature value is the rounded
//! mean of a fixed window of consecutive conversions.  The window is filled
//! by the sampling path and drained once per heater-control cycle.

pub mod temperature;

/// Largest averaging window supported.
pub const MAX_WINDOW: usize = 16;

/// Accumulates raw readings until `target` have arrived, then yields their
/// rounded mean and starts over.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    target: u8,
    sum: u32,
    count: u8,
}

impl SampleWindow {
    /// `target` is clamped to `1..=MAX_WINDOW`.
    pub fn new(target: u8) -> Self {
        Self {
            target: target.clamp(1, MAX_WINDOW as u8),
            sum: 0,
            count: 0,
        }
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Add one reading.  Returns the mean when the window completes.
    pub fn push(&mut self, raw: u16) -> Option<u16> {
        self.sum += u32::from(raw);
        self.count += 1;
        if self.count < self.target {
            return None;
        }
        let n = u32::from(self.count);
        let mean = (self.sum + n / 2) / n;
        self.reset();
        // Mean of u16 values is a u16.
        Some(mean as u16)
    }

    pub fn reset(&mut self) {
        self.sum = 0;
        self.count = 0;
    }
}
