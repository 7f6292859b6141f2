//! Logical pin roles and physical pin identifiers.
//!
//! Drivers never hard-code pin numbers: they ask the resolved
//! [`PinBinding`] for a [`PinRole`] and get back either a concrete [`Pin`]
//! or an explicit [`Assignment::Unassigned`].  There is no `-1` sentinel
//! anywhere, so a missing line can never be mistaken for pin 255.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of extruder channels the firmware can drive directly.
pub const EXTRUDER_SLOTS: u8 = 2;

/// Total number of logical roles (size of a [`PinBinding`]).
pub const ROLE_COUNT: usize = 39;

// ---------------------------------------------------------------------------
// Physical pins
// ---------------------------------------------------------------------------

/// Analog inputs are numbered separately from digital lines on the
/// AVR boards, so analog 4 and digital 4 are different pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PinKind {
    Digital,
    Analog,
}

/// A concrete I/O line on the selected board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pin {
    pub kind: PinKind,
    pub number: u8,
}

impl Pin {
    pub const fn digital(number: u8) -> Self {
        Self {
            kind: PinKind::Digital,
            number,
        }
    }

    pub const fn analog(number: u8) -> Self {
        Self {
            kind: PinKind::Analog,
            number,
        }
    }

    pub fn is_analog(&self) -> bool {
        self.kind == PinKind::Analog
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PinKind::Digital => write!(f, "D{}", self.number),
            PinKind::Analog => write!(f, "A{}", self.number),
        }
    }
}

// ---------------------------------------------------------------------------
// Logical roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// Every hardware capability the firmware may ask the board for.
///
/// Extruder roles carry the extruder channel (`0..EXTRUDER_SLOTS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinRole {
    AxisStep(Axis),
    AxisDirection(Axis),
    AxisMinLimit(Axis),
    AxisMaxLimit(Axis),
    AxisEnable(Axis),
    MotorSpeed(u8),
    MotorDirection(u8),
    HeaterControl(u8),
    FanControl(u8),
    TemperatureInput(u8),
    ValveDirection(u8),
    ValveEnable(u8),
    StepEnable(u8),
    BedHeater,
    PowerSupplyControl,
    DebugOutput,
    StorageSelect,
    StorageDetect,
    StorageWrite,
    Rs485TxEnable,
    Rs485RxEnable,
}

const AXIS_ROLE_KINDS: usize = 5;
const EXTRUDER_ROLE_BASE: usize = AXIS_ROLE_KINDS * 3;
const SINGLE_ROLE_BASE: usize = EXTRUDER_ROLE_BASE + 8 * EXTRUDER_SLOTS as usize;

impl PinRole {
    /// Every role, in index order.  Resolution walks roles in this order,
    /// so the first reported problem is stable across runs.
    pub const ALL: [PinRole; ROLE_COUNT] = [
        PinRole::AxisStep(Axis::X),
        PinRole::AxisStep(Axis::Y),
        PinRole::AxisStep(Axis::Z),
        PinRole::AxisDirection(Axis::X),
        PinRole::AxisDirection(Axis::Y),
        PinRole::AxisDirection(Axis::Z),
        PinRole::AxisMinLimit(Axis::X),
        PinRole::AxisMinLimit(Axis::Y),
        PinRole::AxisMinLimit(Axis::Z),
        PinRole::AxisMaxLimit(Axis::X),
        PinRole::AxisMaxLimit(Axis::Y),
        PinRole::AxisMaxLimit(Axis::Z),
        PinRole::AxisEnable(Axis::X),
        PinRole::AxisEnable(Axis::Y),
        PinRole::AxisEnable(Axis::Z),
        PinRole::MotorSpeed(0),
        PinRole::MotorSpeed(1),
        PinRole::MotorDirection(0),
        PinRole::MotorDirection(1),
        PinRole::HeaterControl(0),
        PinRole::HeaterControl(1),
        PinRole::FanControl(0),
        PinRole::FanControl(1),
        PinRole::TemperatureInput(0),
        PinRole::TemperatureInput(1),
        PinRole::ValveDirection(0),
        PinRole::ValveDirection(1),
        PinRole::ValveEnable(0),
        PinRole::ValveEnable(1),
        PinRole::StepEnable(0),
        PinRole::StepEnable(1),
        PinRole::BedHeater,
        PinRole::PowerSupplyControl,
        PinRole::DebugOutput,
        PinRole::StorageSelect,
        PinRole::StorageDetect,
        PinRole::StorageWrite,
        PinRole::Rs485TxEnable,
        PinRole::Rs485RxEnable,
    ];

    /// Dense index into [`PinRole::ALL`], or `None` for an extruder channel
    /// outside `0..EXTRUDER_SLOTS`.
    pub fn index(self) -> Option<usize> {
        let axis = |kind: usize, axis: Axis| Some(kind * 3 + axis.index());
        let extruder = |kind: usize, ch: u8| {
            (ch < EXTRUDER_SLOTS)
                .then(|| EXTRUDER_ROLE_BASE + kind * EXTRUDER_SLOTS as usize + ch as usize)
        };
        match self {
            Self::AxisStep(a) => axis(0, a),
            Self::AxisDirection(a) => axis(1, a),
            Self::AxisMinLimit(a) => axis(2, a),
            Self::AxisMaxLimit(a) => axis(3, a),
            Self::AxisEnable(a) => axis(4, a),
            Self::MotorSpeed(ch) => extruder(0, ch),
            Self::MotorDirection(ch) => extruder(1, ch),
            Self::HeaterControl(ch) => extruder(2, ch),
            Self::FanControl(ch) => extruder(3, ch),
            Self::TemperatureInput(ch) => extruder(4, ch),
            Self::ValveDirection(ch) => extruder(5, ch),
            Self::ValveEnable(ch) => extruder(6, ch),
            Self::StepEnable(ch) => extruder(7, ch),
            Self::BedHeater => Some(SINGLE_ROLE_BASE),
            Self::PowerSupplyControl => Some(SINGLE_ROLE_BASE + 1),
            Self::DebugOutput => Some(SINGLE_ROLE_BASE + 2),
            Self::StorageSelect => Some(SINGLE_ROLE_BASE + 3),
            Self::StorageDetect => Some(SINGLE_ROLE_BASE + 4),
            Self::StorageWrite => Some(SINGLE_ROLE_BASE + 5),
            Self::Rs485TxEnable => Some(SINGLE_ROLE_BASE + 6),
            Self::Rs485RxEnable => Some(SINGLE_ROLE_BASE + 7),
        }
    }

    /// Extruder channel for extruder roles.
    pub fn extruder(self) -> Option<u8> {
        match self {
            Self::MotorSpeed(ch)
            | Self::MotorDirection(ch)
            | Self::HeaterControl(ch)
            | Self::FanControl(ch)
            | Self::TemperatureInput(ch)
            | Self::ValveDirection(ch)
            | Self::ValveEnable(ch)
            | Self::StepEnable(ch) => Some(ch),
            _ => None,
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxisStep(a) => write!(f, "{a} step"),
            Self::AxisDirection(a) => write!(f, "{a} direction"),
            Self::AxisMinLimit(a) => write!(f, "{a} min limit"),
            Self::AxisMaxLimit(a) => write!(f, "{a} max limit"),
            Self::AxisEnable(a) => write!(f, "{a} enable"),
            Self::MotorSpeed(ch) => write!(f, "extruder {ch} motor speed"),
            Self::MotorDirection(ch) => write!(f, "extruder {ch} motor direction"),
            Self::HeaterControl(ch) => write!(f, "extruder {ch} heater"),
            Self::FanControl(ch) => write!(f, "extruder {ch} fan"),
            Self::TemperatureInput(ch) => write!(f, "extruder {ch} temperature input"),
            Self::ValveDirection(ch) => write!(f, "extruder {ch} valve direction"),
            Self::ValveEnable(ch) => write!(f, "extruder {ch} valve enable"),
            Self::StepEnable(ch) => write!(f, "extruder {ch} step enable"),
            Self::BedHeater => write!(f, "bed heater"),
            Self::PowerSupplyControl => write!(f, "power supply control"),
            Self::DebugOutput => write!(f, "debug output"),
            Self::StorageSelect => write!(f, "SD card select"),
            Self::StorageDetect => write!(f, "SD card detect"),
            Self::StorageWrite => write!(f, "SD card write protect"),
            Self::Rs485TxEnable => write!(f, "RS485 TX enable"),
            Self::Rs485RxEnable => write!(f, "RS485 RX enable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// What a role resolves to on the selected board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Assignment {
    Assigned(Pin),
    #[default]
    Unassigned,
}

impl Assignment {
    pub fn pin(self) -> Option<Pin> {
        match self {
            Self::Assigned(pin) => Some(pin),
            Self::Unassigned => None,
        }
    }

    pub fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

impl From<Option<Pin>> for Assignment {
    fn from(pin: Option<Pin>) -> Self {
        pin.map_or(Self::Unassigned, Self::Assigned)
    }
}

/// Complete map from every [`PinRole`] to an [`Assignment`].
///
/// ```compile_fail
/// let forged: fived_hw::pins::PinBinding = serde_json::from_str("[]").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PinBinding {
    slots: heapless::Vec<Assignment, ROLE_COUNT>,
}

impl PinBinding {
    /// A binding with every role unassigned.
    pub fn unassigned() -> Self {
        let mut slots = heapless::Vec::new();
        let filled = slots.resize(ROLE_COUNT, Assignment::Unassigned);
        debug_assert!(filled.is_ok(), "capacity is ROLE_COUNT");
        Self { slots }
    }

    pub fn get(&self, role: PinRole) -> Assignment {
        role.index()
            .and_then(|i| self.slots.get(i).copied())
            .unwrap_or(Assignment::Unassigned)
    }

    pub(crate) fn set(&mut self, role: PinRole, assignment: Assignment) {
        if let Some(slot) = role.index().and_then(|i| self.slots.get_mut(i)) {
            *slot = assignment;
        }
    }

    /// All assigned roles in [`PinRole::ALL`] order.
    pub fn assigned(&self) -> impl Iterator<Item = (PinRole, Pin)> + '_ {
        PinRole::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(role, a)| a.pin().map(|pin| (*role, pin)))
    }
}

impl Default for PinBinding {
    fn default() -> Self {
        Self::unassigned()
    }
}
