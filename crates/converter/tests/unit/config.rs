//! # Geometry Configuration Tests
//!
//! Verifies the default geometry, partial JSON overrides, and every
//! rejection path of the spec derivation.

use rctrace_core::codec::AddressSpec;
use rctrace_core::config::GeometryConfig;
use rctrace_core::error::ConfigError;

/// The built-in defaults match the baseline geometry.
#[test]
fn default_geometry_values() {
    let config = GeometryConfig::default();
    assert_eq!(config.density_gb, 8);
    assert_eq!(config.page_kb, 4);
    assert_eq!(config.subarray_rows, 512);
    assert_eq!(config.banks, 8);
    assert_eq!(config.prefetch, 16);
    assert_eq!(config.channel_width_bits, 32);
}

/// A JSON override touches only the named field.
#[test]
fn json_partial_override() {
    let config: GeometryConfig = serde_json::from_str(r#"{"density_gb": 16}"#).unwrap();
    assert_eq!(config.density_gb, 16);
    assert_eq!(config.page_kb, 4);

    // Doubling density adds one row bit.
    let spec = AddressSpec::new(&config).unwrap();
    assert_eq!(spec.row_bits(), 16);
    assert_eq!(spec.total_bits(), 31);
}

/// A wider channel shifts the transaction offset and shrinks the column.
#[test]
fn wider_channel_moves_partition() {
    let config: GeometryConfig =
        serde_json::from_str(r#"{"channel_width_bits": 64, "prefetch": 8}"#).unwrap();
    let spec = AddressSpec::new(&config).unwrap();
    // 8 beats of 8 bytes = 64-byte fetch: same tx offset as the default.
    assert_eq!(spec.tx_offset(), 6);
    assert_eq!(spec.column_bits(), 6);
}

/// Non-power-of-two fields are rejected by name.
#[test]
fn rejects_non_power_of_two_banks() {
    let config = GeometryConfig {
        banks: 3,
        ..GeometryConfig::default()
    };
    assert_eq!(
        AddressSpec::new(&config),
        Err(ConfigError::NotPowerOfTwo {
            field: "banks",
            value: 3
        })
    );
}

/// A subarray larger than a bank cannot divide it.
#[test]
fn rejects_subarray_larger_than_bank() {
    let config = GeometryConfig {
        subarray_rows: 1 << 16,
        ..GeometryConfig::default()
    };
    assert_eq!(
        AddressSpec::new(&config),
        Err(ConfigError::SubarrayDivision {
            subarray_rows: 1 << 16,
            rows_per_bank: 1 << 15
        })
    );
}

/// A fetch wider than the page leaves no column bits.
#[test]
fn rejects_negative_column_width() {
    let config = GeometryConfig {
        prefetch: 1 << 12,
        ..GeometryConfig::default()
    };
    assert!(matches!(
        AddressSpec::new(&config),
        Err(ConfigError::NegativeWidth { field: "column", .. })
    ));
}

/// A sub-byte channel is rejected.
#[test]
fn rejects_sub_byte_channel() {
    let config = GeometryConfig {
        channel_width_bits: 4,
        ..GeometryConfig::default()
    };
    assert!(AddressSpec::new(&config).is_err());
}
