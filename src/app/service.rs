//! Hardware service. Resolves the board and builds the calibration table
//! once at startup, then serves temperature reads for the process lifetime.
//!
//! ```text
//!  FirmwareConfig ──▶ ┌──────────────────────────┐
//!                     │     HardwareService       │ ──▶ BoardConfig
//!     AnalogPort ───▶ │  resolver · table · E0/E1 │ ──▶ TemperatureReading
//!                     └──────────────────────────┘
//! ```
//!
//! Everything the service owns is immutable after [`HardwareService::init`],
//! so motion, heater and diagnostic code can share it by reference.

use log::{info, warn};

use crate::board::{BoardConfig, ConfigResolver};
use crate::config::FirmwareConfig;
use crate::error::{BoardError, Result, SensorError};
use crate::pins::{EXTRUDER_SLOTS, PinRole};
use crate::sensors::temperature::{ExtruderThermometer, TemperatureReading};
use crate::thermistor::{CalibrationTable, DECI, reference, resolve_temperature};

use super::ports::AnalogPort;

// ───────────────────────────────────────────────────────────────
// HardwareService
// ───────────────────────────────────────────────────────────────

pub struct HardwareService {
    board: BoardConfig,
    /// Only built when extruders are read through motherboard pins; an
    /// RS485 extruder controller measures its own temperature.
    table: Option<CalibrationTable>,
    thermometers: heapless::Vec<ExtruderThermometer, { EXTRUDER_SLOTS as usize }>,
}

impl HardwareService {
    /// Validate the configuration, resolve the board and build the table.
    /// Any failure is fatal: the caller must not proceed to actuator control.
    pub fn init(config: &FirmwareConfig) -> Result<Self> {
        config.validate()?;

        let board = ConfigResolver::new(config.board_id, config.features, config.mcu).into_config()?;

        let extruders = board.features().direct_extruders();
        let mut thermometers = heapless::Vec::new();
        let table = if extruders == 0 {
            info!("Extruders on external controller; local temperature conversion off");
            None
        } else {
            let table = match &config.calibration {
                Some(samples) => CalibrationTable::new(samples, config.adc_max)?,
                None => reference::epcos_b57560(config.adc_max)?,
            };
            check_dead_zone(&table, config.half_dead_zone_c);

            for ch in 0..extruders {
                let therm = ExtruderThermometer::new(&board, ch, config.temperature_samples)?;
                info!(
                    "E{ch}: thermistor on A{}, {} samples x {} us",
                    therm.channel(),
                    config.temperature_samples,
                    config.sample_period_us
                );
                thermometers
                    .push(therm)
                    .map_err(|_| BoardError::TooManyExtruders(extruders))?;
            }
            Some(table)
        };

        Ok(Self {
            board,
            table,
            thermometers,
        })
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    pub fn calibration(&self) -> Option<&CalibrationTable> {
        self.table.as_ref()
    }

    pub fn thermometers(&self) -> &[ExtruderThermometer] {
        &self.thermometers
    }

    /// Convert an already averaged raw value.  `None` when the board has no
    /// local thermistors.
    pub fn convert(&self, raw: u16) -> Option<i16> {
        self.table.as_ref().map(|t| resolve_temperature(t, raw))
    }

    /// Sample and convert extruder `extruder`'s temperature.
    pub fn read_temperature<A: AnalogPort>(
        &self,
        extruder: u8,
        adc: &mut A,
    ) -> Result<TemperatureReading> {
        let missing = SensorError::ChannelUnassigned(PinRole::TemperatureInput(extruder));
        let therm = self
            .thermometers
            .iter()
            .find(|t| t.extruder() == extruder)
            .ok_or(missing)?;
        let table = self.table.as_ref().ok_or(missing)?;
        Ok(therm.read(adc, table)?)
    }
}

/// Warn when part of the table is too coarse to resolve temperature
/// differences inside the heater's dead band.
fn check_dead_zone(table: &CalibrationTable, half_dead_zone_c: u8) {
    let band_deci = 2 * u32::from(half_dead_zone_c) * DECI as u32;
    let (segment, step) = table.coarsest_step();
    if step > band_deci {
        let lo = table.samples()[segment];
        let hi = table.samples()[segment + 1];
        warn!(
            "Calibration segment {}..{}\u{00b0}C moves {}.{}\u{00b0}C per count, wider than the \
             {}\u{00b0}C dead band",
            lo.celsius,
            hi.celsius,
            step / 10,
            step % 10,
            band_deci / 10
        );
    }
}
