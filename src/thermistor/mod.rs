//! Thermistor calibration table and raw-reading-to-temperature conversion.
//!
//! A [`CalibrationTable`] is an ordered list of `(raw ADC value, °C)`
//! samples.  [`resolve_temperature`] finds the bracketing pair with a binary
//! search and interpolates linearly between them, using integer arithmetic
//! only so it can run from a timer-interrupt sampling path.
//!
//! Out-of-range readings are clamped to the first or last sample, never
//! extrapolated: a disconnected or shorted thermistor reads as a pegged
//! extreme temperature instead of a runaway value.

pub mod reference;

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Maximum number of samples a table can hold.
pub const MAX_SAMPLES: usize = 64;

/// Fixed-point scale of [`resolve_decicelsius`].
pub const DECI: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub raw: u16,
    pub celsius: i16,
}

impl CalibrationSample {
    pub const fn new(raw: u16, celsius: i16) -> Self {
        Self { raw, celsius }
    }
}

/// Where a raw reading falls relative to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Below the first sample; clamps to its temperature.
    BelowRange,
    InRange,
    /// Above the last sample; clamps to its temperature.
    AboveRange,
}

/// Validated, immutable calibration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalibrationTable {
    samples: heapless::Vec<CalibrationSample, MAX_SAMPLES>,
}

impl CalibrationTable {
    /// Validate `samples` and build a table.
    ///
    /// Raw values must strictly increase, temperatures must strictly move in
    /// one direction, and no raw value may exceed `adc_max`.
    pub fn new(samples: &[CalibrationSample], adc_max: u16) -> Result<Self, CalibrationError> {
        if samples.len() < 2 {
            return Err(CalibrationError::TooFewSamples(samples.len()));
        }
        let stored = heapless::Vec::from_slice(samples)
            .map_err(|_| CalibrationError::TooManySamples(samples.len()))?;

        let falling = samples[1].celsius < samples[0].celsius;
        for (i, s) in samples.iter().enumerate() {
            if s.raw > adc_max {
                return Err(CalibrationError::RawAboveAdcMax { index: i, raw: s.raw });
            }
            if i == 0 {
                continue;
            }
            let prev = &samples[i - 1];
            if s.raw <= prev.raw {
                return Err(CalibrationError::RawNotIncreasing { index: i });
            }
            let ordered = if falling {
                s.celsius < prev.celsius
            } else {
                s.celsius > prev.celsius
            };
            if !ordered {
                return Err(CalibrationError::TemperatureNotMonotonic { index: i });
            }
        }

        Ok(Self { samples: stored })
    }

    pub fn samples(&self) -> &[CalibrationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> CalibrationSample {
        self.samples[0]
    }

    pub fn last(&self) -> CalibrationSample {
        self.samples[self.samples.len() - 1]
    }

    pub fn classify(&self, raw: u16) -> Coverage {
        if raw < self.first().raw {
            Coverage::BelowRange
        } else if raw > self.last().raw {
            Coverage::AboveRange
        } else {
            Coverage::InRange
        }
    }

    /// Steepest segment slope in tenths of a degree per ADC count, with the
    /// index of the segment's first sample.
    pub fn coarsest_step(&self) -> (usize, u32) {
        self.samples
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let dt = (i32::from(w[1].celsius) - i32::from(w[0].celsius)).unsigned_abs();
                let dr = u32::from(w[1].raw - w[0].raw);
                (i, (dt * DECI as u32).div_ceil(dr))
            })
            .max_by_key(|&(_, step)| step)
            .unwrap_or((0, 0))
    }

    /// Pair of samples bracketing `raw`, or the clamped endpoint.
    fn bracket(&self, raw: u16) -> Bracket {
        let idx = self.samples.partition_point(|s| s.raw <= raw);
        if idx == 0 {
            return Bracket::Clamped(self.first());
        }
        if idx == self.samples.len() {
            return Bracket::Clamped(self.last());
        }
        let lo = self.samples[idx - 1];
        if lo.raw == raw {
            return Bracket::Clamped(lo);
        }
        Bracket::Between(lo, self.samples[idx])
    }
}

enum Bracket {
    /// Exact hit or outside the table.
    Clamped(CalibrationSample),
    Between(CalibrationSample, CalibrationSample),
}

/// Convert an averaged raw reading to whole degrees Celsius.
pub fn resolve_temperature(table: &CalibrationTable, raw: u16) -> i16 {
    match table.bracket(raw) {
        Bracket::Clamped(s) => s.celsius,
        // Rounded value is bounded by the bracket, which is i16.
        Bracket::Between(lo, hi) => interpolate(lo, hi, raw, 1) as i16,
    }
}

/// Same conversion at 0.1 °C resolution.
pub fn resolve_decicelsius(table: &CalibrationTable, raw: u16) -> i32 {
    match table.bracket(raw) {
        Bracket::Clamped(s) => i32::from(s.celsius) * DECI,
        Bracket::Between(lo, hi) => interpolate(lo, hi, raw, DECI),
    }
}

fn interpolate(lo: CalibrationSample, hi: CalibrationSample, raw: u16, scale: i32) -> i32 {
    let span = i64::from(hi.raw - lo.raw);
    let offset = i64::from(raw - lo.raw);
    let delta = (i64::from(hi.celsius) - i64::from(lo.celsius)) * i64::from(scale);
    // |result| never exceeds the bracket, so it fits back into i32.
    (i64::from(lo.celsius) * i64::from(scale) + div_round(delta * offset, span)) as i32
}

/// Integer division rounding half away from zero.  `d` must be positive.
fn div_round(n: i64, d: i64) -> i64 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}
