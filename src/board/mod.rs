//! Board configuration registry.
//!
//! One closed enum variant per supported motherboard.  Each variant owns a
//! static pin table ([`variants`]), the microcontroller it is built for, its
//! extruder topology, default feature flags and the role pairs it
//! deliberately multiplexes onto one line.
//!
//! ```text
//!   board id ──▶ BoardVariant ──▶ resolver ──▶ BoardConfig (immutable)
//! ```

pub mod resolver;
pub mod variants;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::pins::{Assignment, PinRole};
use variants::BoardPins;

pub use resolver::{
    BoardConfig, ConfigResolver, Requirement, ResolutionState, bind_pins, requirement,
    resolve_board_configuration,
};

// ---------------------------------------------------------------------------
// Microcontrollers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mcu {
    ATmega168,
    ATmega328P,
    ATmega644P,
    ATmega1280,
}

impl fmt::Display for Mcu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ATmega168 => write!(f, "ATmega168"),
            Self::ATmega328P => write!(f, "ATmega328P"),
            Self::ATmega644P => write!(f, "ATmega644P"),
            Self::ATmega1280 => write!(f, "ATmega1280"),
        }
    }
}

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

/// How the extruders are wired to the motherboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtruderTopology {
    /// Extruder motor, heater and thermistor hang off motherboard pins.
    DirectDrive,
    /// Extruders have their own controller reached over RS485.
    Rs485Controller,
}

/// Firmware features that decide which roles must have a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Extruders are driven by a separate serial controller.
    pub external_extruder_controller: bool,
    /// Direct-drive extruders in use (ignored with an external controller).
    pub extruder_count: u8,
    /// Drive the per-axis stepper enable lines.
    pub stepper_enable: bool,
    /// Home against max endstops as well as min.
    pub max_endstops: bool,
    /// Extruders have a valve (direction + enable lines).
    pub valves: bool,
    pub bed_heater: bool,
    pub power_supply_control: bool,
    pub storage_card: bool,
    pub debug_output: bool,
}

impl FeatureFlags {
    /// Number of extruders wired to motherboard pins under these flags.
    pub fn direct_extruders(&self) -> u8 {
        if self.external_extruder_controller {
            0
        } else {
            self.extruder_count
        }
    }
}

// ---------------------------------------------------------------------------
// Board variants
// ---------------------------------------------------------------------------

/// Every supported motherboard.  The discriminant is the board id used in
/// firmware configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BoardVariant {
    ArduinoDiecimila = 0,
    Sanguino = 1,
    RepRapRs485 = 2,
    ArduinoMega = 3,
    Duemilanove = 4,
}

impl BoardVariant {
    pub const ALL: [BoardVariant; 5] = [
        Self::ArduinoDiecimila,
        Self::Sanguino,
        Self::RepRapRs485,
        Self::ArduinoMega,
        Self::Duemilanove,
    ];

    /// Look a board up by id.
    pub fn from_id(id: u8) -> Result<Self, BoardError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.id() == id)
            .ok_or(BoardError::UnsupportedBoard(id))
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ArduinoDiecimila => "Arduino Diecimila",
            Self::Sanguino => "Sanguino/RepRap motherboard (direct-drive extruders)",
            Self::RepRapRs485 => "RepRap motherboard (RS485 extruders)",
            Self::ArduinoMega => "Arduino Mega",
            Self::Duemilanove => "Duemilanove w/ ATmega328P",
        }
    }

    pub const fn mcu(self) -> Mcu {
        match self {
            Self::ArduinoDiecimila => Mcu::ATmega168,
            Self::Sanguino | Self::RepRapRs485 => Mcu::ATmega644P,
            Self::ArduinoMega => Mcu::ATmega1280,
            Self::Duemilanove => Mcu::ATmega328P,
        }
    }

    pub const fn topology(self) -> ExtruderTopology {
        match self {
            Self::RepRapRs485 => ExtruderTopology::Rs485Controller,
            _ => ExtruderTopology::DirectDrive,
        }
    }

    /// Feature set the board ships with.  Resolves cleanly for every
    /// variant.
    pub const fn default_features(self) -> FeatureFlags {
        match self {
            Self::ArduinoDiecimila => FeatureFlags {
                external_extruder_controller: false,
                extruder_count: 1,
                stepper_enable: false,
                max_endstops: true,
                valves: true,
                bed_heater: false,
                power_supply_control: false,
                storage_card: false,
                debug_output: false,
            },
            Self::Sanguino => FeatureFlags {
                external_extruder_controller: false,
                extruder_count: 2,
                stepper_enable: true,
                max_endstops: true,
                valves: true,
                bed_heater: false,
                power_supply_control: false,
                storage_card: false,
                debug_output: false,
            },
            Self::RepRapRs485 => FeatureFlags {
                external_extruder_controller: true,
                extruder_count: 2,
                stepper_enable: true,
                max_endstops: true,
                valves: false,
                bed_heater: false,
                power_supply_control: true,
                storage_card: true,
                debug_output: true,
            },
            Self::ArduinoMega => FeatureFlags {
                external_extruder_controller: false,
                extruder_count: 1,
                stepper_enable: true,
                max_endstops: true,
                valves: false,
                bed_heater: false,
                power_supply_control: false,
                storage_card: false,
                debug_output: false,
            },
            Self::Duemilanove => FeatureFlags {
                external_extruder_controller: false,
                extruder_count: 1,
                stepper_enable: false,
                max_endstops: false,
                valves: false,
                bed_heater: false,
                power_supply_control: true,
                storage_card: false,
                debug_output: false,
            },
        }
    }

    /// Static wiring table for this board.
    pub fn pins(self) -> &'static BoardPins {
        match self {
            Self::ArduinoDiecimila => &variants::ARDUINO_DIECIMILA,
            Self::Sanguino => &variants::SANGUINO,
            Self::RepRapRs485 => &variants::REPRAP_RS485,
            Self::ArduinoMega => &variants::ARDUINO_MEGA,
            Self::Duemilanove => &variants::DUEMILANOVE,
        }
    }

    /// Raw board wiring for `role`, before any feature filtering.
    pub fn binding(self, role: PinRole) -> Assignment {
        self.pins().binding(role)
    }

    /// Whether the board deliberately shares one line between `a` and `b`.
    pub fn is_multiplexed(self, a: PinRole, b: PinRole) -> bool {
        self.pins().is_multiplexed(a, b)
    }
}

impl fmt::Display for BoardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::{Axis, Pin};

    #[test]
    fn ids_round_trip_through_registry() {
        for v in BoardVariant::ALL {
            assert_eq!(BoardVariant::from_id(v.id()), Ok(v));
        }
    }

    #[test]
    fn unknown_id_is_unsupported() {
        assert_eq!(BoardVariant::from_id(5), Err(BoardError::UnsupportedBoard(5)));
        assert_eq!(BoardVariant::from_id(255), Err(BoardError::UnsupportedBoard(255)));
    }

    #[test]
    fn sanguino_wiring_matches_schematic() {
        let b = BoardVariant::Sanguino;
        assert_eq!(b.binding(PinRole::AxisStep(Axis::X)).pin(), Some(Pin::digital(15)));
        assert_eq!(b.binding(PinRole::TemperatureInput(0)).pin(), Some(Pin::analog(4)));
        assert_eq!(b.binding(PinRole::MotorSpeed(1)).pin(), Some(Pin::digital(4)));
        assert_eq!(b.binding(PinRole::StepEnable(1)), Assignment::Unassigned);
        assert_eq!(b.binding(PinRole::BedHeater), Assignment::Unassigned);
    }

    #[test]
    fn single_extruder_boards_leave_second_channel_unwired() {
        for b in [BoardVariant::ArduinoMega, BoardVariant::Duemilanove, BoardVariant::ArduinoDiecimila] {
            assert!(!b.binding(PinRole::MotorSpeed(1)).is_assigned());
            assert!(!b.binding(PinRole::HeaterControl(1)).is_assigned());
        }
    }

    #[test]
    fn multiplex_lookup_is_symmetric() {
        let b = BoardVariant::ArduinoDiecimila;
        let zmax = PinRole::AxisMaxLimit(Axis::Z);
        let valve = PinRole::ValveDirection(0);
        assert!(b.is_multiplexed(zmax, valve));
        assert!(b.is_multiplexed(valve, zmax));
        assert!(!BoardVariant::ArduinoMega.is_multiplexed(zmax, valve));
    }

    #[test]
    fn rs485_board_has_no_direct_extruders_by_default() {
        let flags = BoardVariant::RepRapRs485.default_features();
        assert_eq!(flags.direct_extruders(), 0);
        assert_eq!(BoardVariant::RepRapRs485.topology(), ExtruderTopology::Rs485Controller);
    }
}
