//! Extruder thermistor input.
//!
//! Takes `samples` consecutive conversions from the extruder's analog
//! channel, averages them and resolves the mean through the calibration
//! table.  A reading outside the table is clamped, flagged in
//! [`TemperatureReading::coverage`] and logged, but is never an error: the
//! heater loop keeps running on the pegged value.

use log::{debug, warn};

use super::SampleWindow;
use crate::app::ports::AnalogPort;
use crate::board::BoardConfig;
use crate::error::SensorError;
use crate::pins::PinRole;
use crate::thermistor::{CalibrationTable, Coverage, resolve_temperature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureReading {
    /// Averaged raw value.
    pub raw: u16,
    pub celsius: i16,
    pub coverage: Coverage,
}

impl TemperatureReading {
    pub fn clamped(&self) -> bool {
        self.coverage != Coverage::InRange
    }
}

#[derive(Debug, Clone)]
pub struct ExtruderThermometer {
    extruder: u8,
    channel: u8,
    samples: u8,
}

impl ExtruderThermometer {
    /// Bind extruder `extruder`'s temperature input on a resolved board.
    pub fn new(board: &BoardConfig, extruder: u8, samples: u8) -> Result<Self, SensorError> {
        let role = PinRole::TemperatureInput(extruder);
        let pin = board
            .pin(role)
            .pin()
            .ok_or(SensorError::ChannelUnassigned(role))?;
        if !pin.is_analog() {
            return Err(SensorError::NotAnalogPin(pin));
        }
        Ok(Self {
            extruder,
            channel: pin.number,
            samples,
        })
    }

    pub fn extruder(&self) -> u8 {
        self.extruder
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn read<A: AnalogPort>(
        &self,
        adc: &mut A,
        table: &CalibrationTable,
    ) -> Result<TemperatureReading, SensorError> {
        let mut window = SampleWindow::new(self.samples);
        let raw = loop {
            let sample = adc.read_raw(self.channel)?;
            if let Some(mean) = window.push(sample) {
                break mean;
            }
        };

        let celsius = resolve_temperature(table, raw);
        let coverage = table.classify(raw);
        match coverage {
            Coverage::InRange => debug!("E{} raw={raw} -> {celsius}\u{00b0}C", self.extruder),
            Coverage::BelowRange | Coverage::AboveRange => warn!(
                "E{} raw={raw} outside calibration table, clamped to {celsius}\u{00b0}C",
                self.extruder
            ),
        }

        Ok(TemperatureReading {
            raw,
            celsius,
            coverage,
        })
    }
}
