//! Board resolution across every supported motherboard.

use fived_hw::board::{
    BoardVariant, ConfigResolver, FeatureFlags, Mcu, ResolutionState, resolve_board_configuration,
};
use fived_hw::error::BoardError;
use fived_hw::pins::{Axis, Pin, PinRole};

fn defaults(variant: BoardVariant) -> FeatureFlags {
    variant.default_features()
}

// ── Every board resolves with its own defaults ────────────────

#[test]
fn every_variant_resolves_with_default_features() {
    for variant in BoardVariant::ALL {
        let cfg = resolve_board_configuration(variant.id(), &defaults(variant))
            .unwrap_or_else(|e| panic!("{variant}: {e}"));
        assert_eq!(cfg.variant(), variant);
        for axis in Axis::ALL {
            assert!(cfg.pin(PinRole::AxisStep(axis)).is_assigned(), "{variant} {axis} step");
            assert!(cfg.pin(PinRole::AxisDirection(axis)).is_assigned(), "{variant} {axis} dir");
            assert!(cfg.pin(PinRole::AxisMinLimit(axis)).is_assigned(), "{variant} {axis} min");
        }
    }
}

#[test]
fn sanguino_pin_map_matches_board_wiring() {
    let cfg = resolve_board_configuration(1, &defaults(BoardVariant::Sanguino)).unwrap();
    assert_eq!(cfg.pin(PinRole::AxisStep(Axis::X)).pin(), Some(Pin::digital(15)));
    assert_eq!(cfg.pin(PinRole::TemperatureInput(0)).pin(), Some(Pin::analog(4)));
    assert_eq!(cfg.pin(PinRole::TemperatureInput(1)).pin(), Some(Pin::analog(3)));
    // X and Y share one enable line.
    assert_eq!(
        cfg.pin(PinRole::AxisEnable(Axis::X)),
        cfg.pin(PinRole::AxisEnable(Axis::Y))
    );
}

#[test]
fn rs485_board_exposes_bus_and_no_local_extruder_pins() {
    let cfg = resolve_board_configuration(2, &defaults(BoardVariant::RepRapRs485)).unwrap();
    assert_eq!(cfg.pin(PinRole::PowerSupplyControl).pin(), Some(Pin::digital(14)));
    assert!(cfg.pin(PinRole::Rs485TxEnable).is_assigned());
    assert!(cfg.pin(PinRole::Rs485RxEnable).is_assigned());
    assert!(!cfg.pin(PinRole::TemperatureInput(0)).is_assigned());
    assert!(!cfg.pin(PinRole::HeaterControl(0)).is_assigned());
}

// ── Rejections ────────────────────────────────────────────────

#[test]
fn second_extruder_on_single_extruder_board_is_rejected() {
    let flags = FeatureFlags {
        extruder_count: 2,
        ..defaults(BoardVariant::ArduinoMega)
    };
    match resolve_board_configuration(3, &flags) {
        Err(BoardError::MissingPinBinding(role)) => assert_eq!(role.extruder(), Some(1)),
        other => panic!("expected missing E1 binding, got {other:?}"),
    }
}

#[test]
fn unknown_board_id_is_rejected() {
    assert_eq!(
        resolve_board_configuration(9, &defaults(BoardVariant::Sanguino)),
        Err(BoardError::UnsupportedBoard(9))
    );
}

#[test]
fn direct_extruders_on_rs485_board_are_rejected() {
    let flags = FeatureFlags {
        external_extruder_controller: false,
        extruder_count: 1,
        ..defaults(BoardVariant::RepRapRs485)
    };
    assert!(matches!(
        resolve_board_configuration(2, &flags),
        Err(BoardError::MissingPinBinding(_))
    ));
}

// ── Resolver state machine ────────────────────────────────────

#[test]
fn resolver_walks_to_resolved_and_stays_there() {
    let mut resolver = ConfigResolver::new(4, None, Some(Mcu::ATmega328P));
    assert_eq!(resolver.state(), ResolutionState::Unresolved);

    let first = resolver.resolve().unwrap().clone();
    assert_eq!(resolver.state(), ResolutionState::Resolved);
    assert_eq!(resolver.resolve().unwrap(), &first);
    assert_eq!(resolver.state(), ResolutionState::Resolved);
}

#[test]
fn resolver_rejects_image_built_for_another_mcu() {
    let mut resolver = ConfigResolver::new(3, None, Some(Mcu::ATmega644P));
    assert!(matches!(
        resolver.resolve(),
        Err(BoardError::McuMismatch { found: Mcu::ATmega644P, .. })
    ));
    assert_eq!(resolver.state(), ResolutionState::Rejected);
}
