//! Fuzz target: board resolution
//!
//! Drives `resolve_board_configuration` with an arbitrary board id and
//! feature bits and verifies:
//! - No panics
//! - Resolution is deterministic
//! - A resolved board never puts two roles on one pin unless the board
//!   declares them multiplexed
//!
//! cargo fuzz run fuzz_board_resolver

#![no_main]

use fived_hw::board::{BoardVariant, FeatureFlags, resolve_board_configuration};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let &[id, count, bits, ..] = data else {
        return;
    };
    let bit = |n: u8| bits & (1 << n) != 0;
    let flags = FeatureFlags {
        external_extruder_controller: bit(0),
        extruder_count: count % 4,
        stepper_enable: bit(1),
        max_endstops: bit(2),
        valves: bit(3),
        bed_heater: bit(4),
        power_supply_control: bit(5),
        storage_card: bit(6),
        debug_output: bit(7),
    };

    let first = resolve_board_configuration(id, &flags);
    assert_eq!(first, resolve_board_configuration(id, &flags));

    let Ok(cfg) = first else {
        return;
    };
    let variant = BoardVariant::from_id(id).expect("resolved board has a known id");
    let assigned: Vec<_> = cfg.assigned().collect();
    for (i, &(a, pa)) in assigned.iter().enumerate() {
        for &(b, pb) in &assigned[i + 1..] {
            assert!(
                pa != pb || variant.is_multiplexed(a, b),
                "{a} and {b} share {pa} on {variant}"
            );
        }
    }
});
