//! Configuration resolver.
//!
//! Turns a board id plus feature flags into an immutable [`BoardConfig`],
//! or rejects it.  Runs once at startup:
//!
//! ```text
//!   Unresolved ──▶ Validating ──▶ Resolved
//!                            └──▶ Rejected
//! ```
//!
//! Both terminal states are sticky.  A rejection is fatal to startup; the
//! firmware must not drive actuators through an unverified pin map.

use log::{debug, error, info};
use serde::Serialize;

use super::variants::BoardPins;
use super::{BoardVariant, FeatureFlags, Mcu};
use crate::error::BoardError;
use crate::pins::{Assignment, EXTRUDER_SLOTS, Pin, PinBinding, PinRole};

// ---------------------------------------------------------------------------
// Role requirements
// ---------------------------------------------------------------------------

/// How much a role matters under a given feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Must be bound to a pin or resolution fails.
    Required,
    /// Exposed when the board wires it, absent otherwise.
    Optional,
    /// Belongs to a feature that is switched off; always exposed as absent.
    Disabled,
}

/// Requirement of `role` under `flags`.
pub fn requirement(role: PinRole, flags: &FeatureFlags) -> Requirement {
    use Requirement::{Disabled, Optional, Required};

    let when = |on: bool| if on { Required } else { Disabled };

    if let Some(ch) = role.extruder() {
        if ch >= flags.direct_extruders() {
            return Disabled;
        }
        return match role {
            PinRole::ValveDirection(_) | PinRole::ValveEnable(_) => when(flags.valves),
            PinRole::StepEnable(_) => Optional,
            _ => Required,
        };
    }

    match role {
        PinRole::AxisStep(_) | PinRole::AxisDirection(_) | PinRole::AxisMinLimit(_) => Required,
        PinRole::AxisMaxLimit(_) => when(flags.max_endstops),
        PinRole::AxisEnable(_) => when(flags.stepper_enable),
        PinRole::BedHeater => when(flags.bed_heater),
        PinRole::PowerSupplyControl => when(flags.power_supply_control),
        PinRole::DebugOutput => when(flags.debug_output),
        PinRole::StorageSelect | PinRole::StorageDetect | PinRole::StorageWrite => {
            when(flags.storage_card)
        }
        PinRole::Rs485TxEnable | PinRole::Rs485RxEnable => {
            when(flags.external_extruder_controller)
        }
        // Extruder roles were handled above.
        _ => Disabled,
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// A validated pin map.  Every assigned role is safe to drive without
/// re-checking; every other role reads [`Assignment::Unassigned`].
///
/// Only the resolver builds one.  It serializes for logging and
/// comparison but cannot be deserialized back:
///
/// ```compile_fail
/// let forged: fived_hw::board::BoardConfig = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoardConfig {
    variant: BoardVariant,
    features: FeatureFlags,
    pins: PinBinding,
}

impl BoardConfig {
    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    pub fn pins(&self) -> &PinBinding {
        &self.pins
    }

    pub fn pin(&self, role: PinRole) -> Assignment {
        self.pins.get(role)
    }

    /// Every exposed `(role, pin)` pair in role order.
    pub fn assigned(&self) -> impl Iterator<Item = (PinRole, Pin)> + '_ {
        self.pins.assigned()
    }
}

/// Validate `variant_id` against `features` and build its pin map.
pub fn resolve_board_configuration(
    variant_id: u8,
    features: &FeatureFlags,
) -> Result<BoardConfig, BoardError> {
    let variant = BoardVariant::from_id(variant_id)?;
    let pins = bind_pins(variant.pins(), features)?;

    debug!("{}: {} roles bound", variant.name(), pins.assigned().count());

    Ok(BoardConfig {
        variant,
        features: *features,
        pins,
    })
}

/// Filter a wiring table through `features`.
///
/// Every required role must be wired, and no two exposed roles may share a
/// pin unless the table declares that pair multiplexed.  Roles are visited
/// in [`PinRole::ALL`] order, so a conflict names the earlier role first.
pub fn bind_pins(board: &BoardPins, features: &FeatureFlags) -> Result<PinBinding, BoardError> {
    if features.extruder_count > EXTRUDER_SLOTS {
        return Err(BoardError::TooManyExtruders(features.extruder_count));
    }

    let mut pins = PinBinding::unassigned();
    for role in PinRole::ALL {
        let wired = board.binding(role);
        match (requirement(role, features), wired) {
            (Requirement::Disabled, _) | (Requirement::Optional, Assignment::Unassigned) => {}
            (Requirement::Required, Assignment::Unassigned) => {
                return Err(BoardError::MissingPinBinding(role));
            }
            (_, Assignment::Assigned(pin)) => {
                check_conflict(board, &pins, role, pin)?;
                pins.set(role, wired);
            }
        }
    }
    Ok(pins)
}

fn check_conflict(
    board: &BoardPins,
    bound: &PinBinding,
    role: PinRole,
    pin: Pin,
) -> Result<(), BoardError> {
    match bound
        .assigned()
        .find(|&(other, p)| p == pin && !board.is_multiplexed(other, role))
    {
        Some((first, _)) => Err(BoardError::PinConflict {
            pin,
            first,
            second: role,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Resolver state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Validating,
    Resolved,
    Rejected,
}

/// One-shot resolver holding the startup inputs and the sticky outcome.
pub struct ConfigResolver {
    variant_id: u8,
    features: Option<FeatureFlags>,
    target_mcu: Option<Mcu>,
    state: ResolutionState,
    outcome: Option<Result<BoardConfig, BoardError>>,
}

impl ConfigResolver {
    /// `features = None` uses the board's own defaults.  `target_mcu` is
    /// the microcontroller the firmware image was built for, if known.
    pub fn new(variant_id: u8, features: Option<FeatureFlags>, target_mcu: Option<Mcu>) -> Self {
        Self {
            variant_id,
            features,
            target_mcu,
            state: ResolutionState::Unresolved,
            outcome: None,
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Run validation once.  Later calls return the cached outcome.
    pub fn resolve(&mut self) -> Result<&BoardConfig, BoardError> {
        let outcome = match self.outcome.take() {
            Some(done) => done,
            None => self.run(),
        };
        self.outcome.insert(outcome).as_ref().map_err(|e| *e)
    }

    /// Consume the resolver, yielding the configuration.
    pub fn into_config(mut self) -> Result<BoardConfig, BoardError> {
        match self.outcome.take() {
            Some(done) => done,
            None => self.run(),
        }
    }

    fn run(&mut self) -> Result<BoardConfig, BoardError> {
        self.state = ResolutionState::Validating;
        let outcome = self.validate();
        match &outcome {
            Ok(cfg) => {
                info!(
                    "Board resolved: {} ({} pins assigned)",
                    cfg.variant(),
                    cfg.assigned().count()
                );
                self.state = ResolutionState::Resolved;
            }
            Err(e) => {
                error!("Board rejected (id {}): {e}", self.variant_id);
                self.state = ResolutionState::Rejected;
            }
        }
        outcome
    }

    fn validate(&self) -> Result<BoardConfig, BoardError> {
        let variant = BoardVariant::from_id(self.variant_id)?;
        if let Some(found) = self.target_mcu {
            if found != variant.mcu() {
                return Err(BoardError::McuMismatch {
                    board: variant,
                    expected: variant.mcu(),
                    found,
                });
            }
        }
        let features = self.features.unwrap_or_else(|| variant.default_features());
        resolve_board_configuration(self.variant_id, &features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::variants::{AxisPins, NO_EXTRUDER};
    use crate::pins::Axis;

    const fn d(n: u8) -> Option<Pin> {
        Some(Pin::digital(n))
    }

    /// Three-axis board with no extruders; each axis gets pins
    /// `base..base+4`, enable unwired.
    fn bench_board(multiplexed: &'static [(PinRole, PinRole)]) -> BoardPins {
        let axis = |base: u8| AxisPins {
            step: d(base),
            dir: d(base + 1),
            min: d(base + 2),
            max: d(base + 3),
            enable: None,
        };
        BoardPins {
            axes: [axis(10), axis(20), axis(30)],
            extruders: [NO_EXTRUDER, NO_EXTRUDER],
            bed_heater: None,
            power_supply: None,
            debug: None,
            sd_select: None,
            sd_detect: None,
            sd_write: None,
            rs485_tx_enable: None,
            rs485_rx_enable: None,
            multiplexed,
        }
    }

    fn motion_only() -> FeatureFlags {
        FeatureFlags {
            external_extruder_controller: false,
            extruder_count: 0,
            stepper_enable: false,
            max_endstops: false,
            valves: false,
            bed_heater: false,
            power_supply_control: false,
            storage_card: false,
            debug_output: false,
        }
    }

    #[test]
    fn bench_board_binds_cleanly() {
        let pins = bind_pins(&bench_board(&[]), &motion_only()).unwrap();
        assert_eq!(pins.assigned().count(), 9);
        assert_eq!(pins.get(PinRole::AxisMaxLimit(Axis::X)), Assignment::Unassigned);
    }

    #[test]
    fn undeclared_shared_pin_names_both_roles() {
        let mut board = bench_board(&[]);
        board.axes[1].step = d(10);
        assert_eq!(
            bind_pins(&board, &motion_only()),
            Err(BoardError::PinConflict {
                pin: Pin::digital(10),
                first: PinRole::AxisStep(Axis::X),
                second: PinRole::AxisStep(Axis::Y),
            })
        );
    }

    #[test]
    fn declared_pair_does_not_admit_a_third_role() {
        const PAIR: &[(PinRole, PinRole)] =
            &[(PinRole::AxisStep(Axis::X), PinRole::AxisDirection(Axis::X))];

        let mut board = bench_board(PAIR);
        board.axes[0].dir = d(10);
        assert!(bind_pins(&board, &motion_only()).is_ok());

        board.axes[2].min = d(10);
        assert_eq!(
            bind_pins(&board, &motion_only()),
            Err(BoardError::PinConflict {
                pin: Pin::digital(10),
                first: PinRole::AxisStep(Axis::X),
                second: PinRole::AxisMinLimit(Axis::Z),
            })
        );
    }

    #[test]
    fn disabled_roles_skip_conflict_checks() {
        let mut board = bench_board(&[]);
        board.axes[0].max = d(20);
        // Max endstops off: the clash with Y step is never exposed.
        assert!(bind_pins(&board, &motion_only()).is_ok());

        let flags = FeatureFlags {
            max_endstops: true,
            ..motion_only()
        };
        assert_eq!(
            bind_pins(&board, &flags),
            Err(BoardError::PinConflict {
                pin: Pin::digital(20),
                first: PinRole::AxisStep(Axis::Y),
                second: PinRole::AxisMaxLimit(Axis::X),
            })
        );
    }

    #[test]
    fn analog_and_digital_pins_never_collide() {
        let mut board = bench_board(&[]);
        board.axes[0].step = Some(Pin::analog(11));
        board.axes[0].dir = d(11);
        assert!(bind_pins(&board, &motion_only()).is_ok());
    }

    #[test]
    fn every_board_resolves_with_its_defaults() {
        for v in BoardVariant::ALL {
            let cfg = resolve_board_configuration(v.id(), &v.default_features());
            assert!(cfg.is_ok(), "{v}: {:?}", cfg.err());
        }
    }

    #[test]
    fn unknown_board_is_rejected() {
        let flags = BoardVariant::Sanguino.default_features();
        assert_eq!(
            resolve_board_configuration(9, &flags),
            Err(BoardError::UnsupportedBoard(9))
        );
    }

    #[test]
    fn second_extruder_on_single_extruder_board_is_missing() {
        let mut flags = BoardVariant::ArduinoMega.default_features();
        flags.extruder_count = 2;
        assert_eq!(
            resolve_board_configuration(BoardVariant::ArduinoMega.id(), &flags),
            Err(BoardError::MissingPinBinding(PinRole::MotorSpeed(1)))
        );
    }

    #[test]
    fn too_many_extruders_is_rejected_before_pin_checks() {
        let mut flags = BoardVariant::Sanguino.default_features();
        flags.extruder_count = 3;
        assert_eq!(
            resolve_board_configuration(BoardVariant::Sanguino.id(), &flags),
            Err(BoardError::TooManyExtruders(3))
        );
    }

    #[test]
    fn disabled_roles_are_exposed_as_unassigned() {
        let mut flags = BoardVariant::Sanguino.default_features();
        flags.extruder_count = 1;
        flags.valves = false;
        let cfg = resolve_board_configuration(BoardVariant::Sanguino.id(), &flags).unwrap();

        assert_eq!(cfg.pin(PinRole::MotorSpeed(1)), Assignment::Unassigned);
        assert_eq!(cfg.pin(PinRole::ValveDirection(0)), Assignment::Unassigned);
        assert_eq!(cfg.pin(PinRole::MotorSpeed(0)).pin(), Some(Pin::digital(12)));
    }

    #[test]
    fn declared_multiplex_is_accepted() {
        let cfg = resolve_board_configuration(
            BoardVariant::ArduinoDiecimila.id(),
            &BoardVariant::ArduinoDiecimila.default_features(),
        )
        .unwrap();
        assert_eq!(cfg.pin(PinRole::AxisMaxLimit(Axis::Z)), cfg.pin(PinRole::ValveDirection(0)));
        assert_eq!(cfg.pin(PinRole::FanControl(0)), cfg.pin(PinRole::StepEnable(0)));
    }

    #[test]
    fn rs485_board_requires_external_controller() {
        let mut flags = BoardVariant::RepRapRs485.default_features();
        flags.external_extruder_controller = false;
        flags.extruder_count = 1;
        assert_eq!(
            resolve_board_configuration(BoardVariant::RepRapRs485.id(), &flags),
            Err(BoardError::MissingPinBinding(PinRole::MotorSpeed(0)))
        );
    }

    #[test]
    fn external_controller_on_direct_drive_board_misses_transceiver() {
        let mut flags = BoardVariant::ArduinoMega.default_features();
        flags.external_extruder_controller = true;
        assert_eq!(
            resolve_board_configuration(BoardVariant::ArduinoMega.id(), &flags),
            Err(BoardError::MissingPinBinding(PinRole::Rs485TxEnable))
        );
    }

    #[test]
    fn resolver_walks_states_and_stays_resolved() {
        let mut r = ConfigResolver::new(BoardVariant::ArduinoMega.id(), None, Some(Mcu::ATmega1280));
        assert_eq!(r.state(), ResolutionState::Unresolved);

        let first = r.resolve().cloned().unwrap();
        assert_eq!(r.state(), ResolutionState::Resolved);

        let second = r.resolve().cloned().unwrap();
        assert_eq!(first, second);
        assert_eq!(r.state(), ResolutionState::Resolved);
    }

    #[test]
    fn resolver_rejection_is_sticky() {
        let mut r = ConfigResolver::new(42, None, None);
        assert_eq!(r.resolve().err(), Some(BoardError::UnsupportedBoard(42)));
        assert_eq!(r.state(), ResolutionState::Rejected);
        assert_eq!(r.resolve().err(), Some(BoardError::UnsupportedBoard(42)));
        assert_eq!(r.state(), ResolutionState::Rejected);
    }

    #[test]
    fn mcu_mismatch_is_rejected() {
        let r = ConfigResolver::new(BoardVariant::Sanguino.id(), None, Some(Mcu::ATmega328P));
        assert_eq!(
            r.into_config(),
            Err(BoardError::McuMismatch {
                board: BoardVariant::Sanguino,
                expected: Mcu::ATmega644P,
                found: Mcu::ATmega328P,
            })
        );
    }
}
