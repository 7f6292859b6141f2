//! Pin tables for every supported motherboard.
//!
//! Single source of truth for board wiring.  `NC` marks a role the board
//! does not wire at all; it becomes [`Assignment::Unassigned`] on lookup.
//!
//! [`Assignment::Unassigned`]: crate::pins::Assignment::Unassigned

use crate::pins::{Assignment, Axis, EXTRUDER_SLOTS, Pin, PinRole};

/// Not connected.
const NC: Option<Pin> = None;

const fn d(n: u8) -> Option<Pin> {
    Some(Pin::digital(n))
}

const fn a(n: u8) -> Option<Pin> {
    Some(Pin::analog(n))
}

pub struct AxisPins {
    pub step: Option<Pin>,
    pub dir: Option<Pin>,
    pub min: Option<Pin>,
    pub max: Option<Pin>,
    pub enable: Option<Pin>,
}

pub struct ExtruderPins {
    pub motor_speed: Option<Pin>,
    pub motor_dir: Option<Pin>,
    pub heater: Option<Pin>,
    pub fan: Option<Pin>,
    /// Analog input channel for the thermistor.
    pub temperature: Option<Pin>,
    pub valve_dir: Option<Pin>,
    pub valve_enable: Option<Pin>,
    pub step_enable: Option<Pin>,
}

/// An extruder slot with nothing wired.
pub const NO_EXTRUDER: ExtruderPins = ExtruderPins {
    motor_speed: NC,
    motor_dir: NC,
    heater: NC,
    fan: NC,
    temperature: NC,
    valve_dir: NC,
    valve_enable: NC,
    step_enable: NC,
};

pub struct BoardPins {
    /// Indexed by [`Axis`].
    pub axes: [AxisPins; 3],
    pub extruders: [ExtruderPins; EXTRUDER_SLOTS as usize],
    pub bed_heater: Option<Pin>,
    pub power_supply: Option<Pin>,
    pub debug: Option<Pin>,
    pub sd_select: Option<Pin>,
    pub sd_detect: Option<Pin>,
    pub sd_write: Option<Pin>,
    pub rs485_tx_enable: Option<Pin>,
    pub rs485_rx_enable: Option<Pin>,
    /// Role pairs wired to one line on purpose.
    pub multiplexed: &'static [(PinRole, PinRole)],
}

impl BoardPins {
    /// Wiring for `role`, before any feature filtering.
    pub fn binding(&self, role: PinRole) -> Assignment {
        let axis = |a: Axis| &self.axes[a as usize];
        let extruder = |ch: u8| self.extruders.get(ch as usize);
        let pin: Option<Pin> = match role {
            PinRole::AxisStep(a) => axis(a).step,
            PinRole::AxisDirection(a) => axis(a).dir,
            PinRole::AxisMinLimit(a) => axis(a).min,
            PinRole::AxisMaxLimit(a) => axis(a).max,
            PinRole::AxisEnable(a) => axis(a).enable,
            PinRole::MotorSpeed(ch) => extruder(ch).and_then(|e| e.motor_speed),
            PinRole::MotorDirection(ch) => extruder(ch).and_then(|e| e.motor_dir),
            PinRole::HeaterControl(ch) => extruder(ch).and_then(|e| e.heater),
            PinRole::FanControl(ch) => extruder(ch).and_then(|e| e.fan),
            PinRole::TemperatureInput(ch) => extruder(ch).and_then(|e| e.temperature),
            PinRole::ValveDirection(ch) => extruder(ch).and_then(|e| e.valve_dir),
            PinRole::ValveEnable(ch) => extruder(ch).and_then(|e| e.valve_enable),
            PinRole::StepEnable(ch) => extruder(ch).and_then(|e| e.step_enable),
            PinRole::BedHeater => self.bed_heater,
            PinRole::PowerSupplyControl => self.power_supply,
            PinRole::DebugOutput => self.debug,
            PinRole::StorageSelect => self.sd_select,
            PinRole::StorageDetect => self.sd_detect,
            PinRole::StorageWrite => self.sd_write,
            PinRole::Rs485TxEnable => self.rs485_tx_enable,
            PinRole::Rs485RxEnable => self.rs485_rx_enable,
        };
        pin.into()
    }

    /// Whether `a` and `b` are declared to share one line.  Symmetric.
    pub fn is_multiplexed(&self, a: PinRole, b: PinRole) -> bool {
        self.multiplexed
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

// ---------------------------------------------------------------------------
// Arduino Diecimila (ATmega168)
// ---------------------------------------------------------------------------

pub const ARDUINO_DIECIMILA: BoardPins = BoardPins {
    axes: [
        AxisPins { step: d(2), dir: d(3), min: d(4), max: d(9), enable: NC },
        AxisPins { step: d(10), dir: d(7), min: d(8), max: d(13), enable: NC },
        AxisPins { step: d(19), dir: d(18), min: d(17), max: d(16), enable: NC },
    ],
    extruders: [
        ExtruderPins {
            motor_speed: d(11),
            motor_dir: d(12),
            heater: d(6),
            fan: d(5),
            temperature: a(0),
            // Shares the Z max endstop line.
            valve_dir: d(16),
            valve_enable: d(15),
            // Shares the fan line.
            step_enable: d(5),
        },
        NO_EXTRUDER,
    ],
    bed_heater: NC,
    power_supply: NC,
    debug: NC,
    sd_select: NC,
    sd_detect: NC,
    sd_write: NC,
    rs485_tx_enable: NC,
    rs485_rx_enable: NC,
    multiplexed: &[
        (PinRole::AxisMaxLimit(Axis::Z), PinRole::ValveDirection(0)),
        (PinRole::FanControl(0), PinRole::StepEnable(0)),
    ],
};

// ---------------------------------------------------------------------------
// Sanguino / RepRap motherboard, direct-drive extruders (ATmega644P)
// ---------------------------------------------------------------------------

pub const SANGUINO: BoardPins = BoardPins {
    axes: [
        AxisPins { step: d(15), dir: d(18), min: d(20), max: d(21), enable: d(19) },
        AxisPins { step: d(23), dir: d(22), min: d(25), max: d(26), enable: d(19) },
        AxisPins { step: d(29), dir: d(30), min: d(1), max: d(2), enable: d(31) },
    ],
    extruders: [
        ExtruderPins {
            motor_speed: d(12),
            motor_dir: d(16),
            heater: d(14),
            fan: d(3),
            temperature: a(4),
            valve_dir: d(17),
            valve_enable: d(13),
            step_enable: d(3),
        },
        ExtruderPins {
            motor_speed: d(4),
            motor_dir: d(0),
            heater: d(24),
            fan: d(7),
            temperature: a(3),
            valve_dir: d(6),
            valve_enable: d(5),
            step_enable: NC,
        },
    ],
    bed_heater: NC,
    power_supply: NC,
    debug: NC,
    sd_select: NC,
    sd_detect: NC,
    sd_write: NC,
    rs485_tx_enable: NC,
    rs485_rx_enable: NC,
    multiplexed: &[
        (PinRole::AxisEnable(Axis::X), PinRole::AxisEnable(Axis::Y)),
        (PinRole::FanControl(0), PinRole::StepEnable(0)),
    ],
};

// ---------------------------------------------------------------------------
// RepRap motherboard with RS485 extruder controllers (ATmega644P)
// ---------------------------------------------------------------------------

pub const REPRAP_RS485: BoardPins = BoardPins {
    axes: [
        AxisPins { step: d(15), dir: d(18), min: d(20), max: d(21), enable: d(19) },
        AxisPins { step: d(23), dir: d(22), min: d(25), max: d(26), enable: d(24) },
        AxisPins { step: d(27), dir: d(28), min: d(30), max: d(31), enable: d(29) },
    ],
    extruders: [NO_EXTRUDER, NO_EXTRUDER],
    bed_heater: NC,
    power_supply: d(14),
    debug: d(0),
    sd_select: d(4),
    sd_detect: d(3),
    sd_write: d(2),
    rs485_tx_enable: d(12),
    rs485_rx_enable: d(13),
    multiplexed: &[],
};

// ---------------------------------------------------------------------------
// Arduino Mega (ATmega1280)
// ---------------------------------------------------------------------------

pub const ARDUINO_MEGA: BoardPins = BoardPins {
    axes: [
        AxisPins { step: d(22), dir: d(23), min: d(2), max: d(3), enable: d(24) },
        AxisPins { step: d(25), dir: d(26), min: d(18), max: d(19), enable: d(27) },
        AxisPins { step: d(28), dir: d(29), min: d(20), max: d(21), enable: d(30) },
    ],
    extruders: [
        ExtruderPins {
            motor_speed: d(31),
            motor_dir: d(32),
            heater: d(9),
            fan: d(8),
            temperature: a(3),
            valve_dir: NC,
            valve_enable: NC,
            step_enable: d(33),
        },
        NO_EXTRUDER,
    ],
    bed_heater: NC,
    power_supply: NC,
    debug: NC,
    sd_select: NC,
    sd_detect: NC,
    sd_write: NC,
    rs485_tx_enable: NC,
    rs485_rx_enable: NC,
    multiplexed: &[],
};

// ---------------------------------------------------------------------------
// Duemilanove w/ ATmega328P
// ---------------------------------------------------------------------------

pub const DUEMILANOVE: BoardPins = BoardPins {
    axes: [
        AxisPins { step: d(19), dir: d(18), min: d(17), max: NC, enable: NC },
        AxisPins { step: d(10), dir: d(7), min: d(8), max: NC, enable: NC },
        AxisPins { step: d(13), dir: d(3), min: d(4), max: NC, enable: NC },
    ],
    extruders: [
        ExtruderPins {
            motor_speed: d(11),
            motor_dir: d(12),
            heater: d(6),
            fan: d(5),
            temperature: a(0),
            valve_dir: NC,
            valve_enable: NC,
            step_enable: d(2),
        },
        NO_EXTRUDER,
    ],
    bed_heater: NC,
    power_supply: d(16),
    debug: NC,
    sd_select: NC,
    sd_detect: NC,
    sd_write: NC,
    rs485_tx_enable: NC,
    rs485_rx_enable: NC,
    multiplexed: &[],
};
