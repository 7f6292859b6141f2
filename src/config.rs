//! Firmware configuration.
//!
//! Selects the board and overrides its feature flags, and carries the
//! sampling contract the temperature path relies on.  Loaded once at
//! startup (JSON on the host, a postcard blob when persisted).

use serde::{Deserialize, Serialize};

use crate::board::{FeatureFlags, Mcu};
use crate::error::Error;
use crate::sensors::MAX_WINDOW;
use crate::thermistor::{CalibrationSample, MAX_SAMPLES};

/// Startup configuration for the hardware layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    // --- Board ---
    /// Motherboard id (see [`BoardVariant`](crate::board::BoardVariant)).
    pub board_id: u8,
    /// Feature override; `None` uses the board's defaults.
    pub features: Option<FeatureFlags>,
    /// Microcontroller this image was built for, checked against the board.
    pub mcu: Option<Mcu>,

    // --- Temperature sampling ---
    /// Raw readings averaged per temperature value.
    pub temperature_samples: u8,
    /// Time per raw ADC conversion (microseconds).
    pub sample_period_us: u16,
    /// Heater tolerance either side of the setpoint (degrees Celsius).
    pub half_dead_zone_c: u8,
    /// Full-scale ADC reading.
    pub adc_max: u16,
    /// Custom thermistor table; `None` uses the EPCOS B57560 reference.
    pub calibration: Option<heapless::Vec<CalibrationSample, MAX_SAMPLES>>,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            board_id: 1,
            features: None,
            mcu: None,

            temperature_samples: 5,
            sample_period_us: 100,
            half_dead_zone_c: 1,
            adc_max: 1023,
            calibration: None,
        }
    }
}

impl FirmwareConfig {
    /// Range-check every field.  Board and table problems are left to
    /// their own resolvers, which report them with more detail.
    pub fn validate(&self) -> Result<(), Error> {
        if self.temperature_samples == 0 {
            return Err(Error::Config("temperature_samples must be at least 1"));
        }
        if usize::from(self.temperature_samples) > MAX_WINDOW {
            return Err(Error::Config("temperature_samples exceeds averaging window"));
        }
        if self.sample_period_us == 0 {
            return Err(Error::Config("sample_period_us must be non-zero"));
        }
        if self.half_dead_zone_c == 0 {
            return Err(Error::Config("half_dead_zone_c must be non-zero"));
        }
        if self.adc_max == 0 {
            return Err(Error::Config("adc_max must be non-zero"));
        }
        Ok(())
    }

    /// Microseconds one averaged temperature value takes to sample.
    pub fn averaging_time_us(&self) -> u32 {
        u32::from(self.temperature_samples) * u32::from(self.sample_period_us)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|_| Error::Config("malformed JSON configuration"))
    }
}
