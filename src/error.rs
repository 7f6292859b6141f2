//! Unified error types for the FiveD hardware layer.
//!
//! A single `Error` enum that every subsystem converts into, so startup can
//! report any configuration failure through one path.  All variants are
//! `Copy` so they can be cached by the resolver state machine and passed
//! around without allocation.

use core::fmt;

use crate::board::{BoardVariant, Mcu};
use crate::pins::{Pin, PinRole};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The board variant could not be resolved into a usable pin map.
    Board(BoardError),
    /// The thermistor calibration table is malformed.
    Calibration(CalibrationError),
    /// A temperature input could not be sampled.
    Sensor(SensorError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(e) => write!(f, "board: {e}"),
            Self::Calibration(e) => write!(f, "calibration: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Board resolution errors
// ---------------------------------------------------------------------------

/// Reasons the configuration resolver rejects a board.  All are fatal:
/// actuators must never be driven through an unverified pin map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// The requested id is not in the registry.
    UnsupportedBoard(u8),
    /// An enabled feature needs a role the board leaves unassigned.
    MissingPinBinding(PinRole),
    /// Two exposed roles share a pin without a declared multiplex.
    PinConflict {
        pin: Pin,
        first: PinRole,
        second: PinRole,
    },
    /// More extruders requested than the firmware has channel slots for.
    TooManyExtruders(u8),
    /// The firmware image targets a different microcontroller.
    McuMismatch {
        board: BoardVariant,
        expected: Mcu,
        found: Mcu,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedBoard(id) => write!(f, "unsupported board id {id}"),
            Self::MissingPinBinding(role) => write!(f, "no pin assigned for required role {role}"),
            Self::PinConflict { pin, first, second } => {
                write!(f, "{first} and {second} both use {pin}")
            }
            Self::TooManyExtruders(n) => write!(f, "{n} extruders requested"),
            Self::McuMismatch {
                board,
                expected,
                found,
            } => write!(f, "{} needs {expected}, firmware built for {found}", board.name()),
        }
    }
}

impl From<BoardError> for Error {
    fn from(e: BoardError) -> Self {
        Self::Board(e)
    }
}

// ---------------------------------------------------------------------------
// Calibration table errors
// ---------------------------------------------------------------------------

/// Why a calibration table was rejected.  `index` always names the second
/// sample of the offending pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Interpolation needs at least two samples.
    TooFewSamples(usize),
    /// The table does not fit the fixed-capacity storage.
    TooManySamples(usize),
    /// Raw values must be strictly increasing (sorted, no duplicates).
    RawNotIncreasing { index: usize },
    /// Temperatures must move strictly in one direction.
    TemperatureNotMonotonic { index: usize },
    /// A raw value the ADC can never produce.
    RawAboveAdcMax { index: usize, raw: u16 },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewSamples(n) => write!(f, "table has {n} samples, need at least 2"),
            Self::TooManySamples(n) => write!(f, "table has {n} samples, capacity exceeded"),
            Self::RawNotIncreasing { index } => {
                write!(f, "raw value at sample {index} is not above its predecessor")
            }
            Self::TemperatureNotMonotonic { index } => {
                write!(f, "temperature at sample {index} breaks monotonic order")
            }
            Self::RawAboveAdcMax { index, raw } => {
                write!(f, "raw value {raw} at sample {index} exceeds ADC range")
            }
        }
    }
}

impl From<CalibrationError> for Error {
    fn from(e: CalibrationError) -> Self {
        Self::Calibration(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// The temperature role is bound to a digital line.
    NotAnalogPin(Pin),
    /// The temperature role has no pin on this board.
    ChannelUnassigned(PinRole),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::NotAnalogPin(pin) => write!(f, "{pin} is not an analog input"),
            Self::ChannelUnassigned(role) => write!(f, "{role} is not assigned"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
