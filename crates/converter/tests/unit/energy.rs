//! # Energy Estimate Tests

use rctrace_core::energy::{estimate, RAILS};

/// The estimate is deterministic and per-rail positive.
#[test]
fn estimate_is_deterministic_and_positive() {
    let a = estimate();
    let b = estimate();
    assert_eq!(a, b);
    assert!(a[0] > 0.0);
    assert!(a[1] > 0.0);
}

/// The low-voltage rail dominates: its standby and burst currents are an
/// order of magnitude above the high-voltage rail's.
#[test]
fn low_voltage_rail_dominates() {
    let totals = estimate();
    assert!(totals[1] > totals[0]);
}

/// The VDD1 rail total matches the hand-computed closed form.
#[test]
fn vdd1_total_matches_hand_computation() {
    // bg_pre = 1701 cycles, bg_act = 1754 cycles for these constants.
    let totals = estimate();
    assert!((totals[0] - 71_535.93).abs() < 1.0, "got {}", totals[0]);
}

/// Rail table sanity: two rails at 1.8 V and 1.1 V.
#[test]
fn rail_table_voltages() {
    assert_eq!(RAILS[0].vdd, 1.8);
    assert_eq!(RAILS[1].vdd, 1.1);
}
