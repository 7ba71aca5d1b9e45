//! DRAM geometry configuration.
//!
//! This module defines the raw geometry knobs from which the address codec
//! derives its bit partition. It provides:
//! 1. **Defaults:** The baseline geometry the original trace sets were cut
//!    for (8 Gb density, 4 KB pages, 512-row subarrays, 8 banks).
//! 2. **Structure:** A serde-deserializable [`GeometryConfig`].
//! 3. **Loading:** JSON file loading for alternative geometries.
//!
//! `GeometryConfig` is raw input only; all derivation and validation lives in
//! [`crate::codec::AddressSpec`], keeping a single copy of the partition
//! logic. Multiple specs derived from different configs can coexist in one
//! process.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

/// Default geometry constants.
///
/// These values define the baseline geometry when not overridden via JSON.
mod defaults {
    /// Device density in gigabits (8 Gb maps to 32 K rows per bank).
    pub const DENSITY_GB: u64 = 8;

    /// Page (row) size in kilobytes. 4 KB both in the OS and in the
    /// memory system.
    pub const PAGE_KB: u64 = 4;

    /// Rows per subarray. RowClone substitution is valid only between two
    /// rows of one subarray.
    pub const SUBARRAY_ROWS: u64 = 512;

    /// Banks per device.
    pub const BANKS: u64 = 8;

    /// Prefetch length in beats per column access.
    pub const PREFETCH: u64 = 16;

    /// Channel width in bits.
    pub const CHANNEL_WIDTH_BITS: u64 = 32;
}

/// Raw DRAM geometry configuration.
///
/// Every field feeds the derivation in [`crate::codec::AddressSpec::new`];
/// none is interpreted anywhere else. A configuration is invalid if any
/// derived bit width would be negative or the subarray size does not evenly
/// divide the rows in a bank, reported as
/// [`crate::error::ConfigError`] at spec construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Device density in gigabits.
    pub density_gb: u64,
    /// Page (row) size in kilobytes.
    pub page_kb: u64,
    /// Rows per subarray.
    pub subarray_rows: u64,
    /// Banks per device.
    pub banks: u64,
    /// Prefetch length in beats per column access.
    pub prefetch: u64,
    /// Channel width in bits.
    pub channel_width_bits: u64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            density_gb: defaults::DENSITY_GB,
            page_kb: defaults::PAGE_KB,
            subarray_rows: defaults::SUBARRAY_ROWS,
            banks: defaults::BANKS,
            prefetch: defaults::PREFETCH,
            channel_width_bits: defaults::CHANNEL_WIDTH_BITS,
        }
    }
}

impl GeometryConfig {
    /// Loads a geometry configuration from a JSON file.
    ///
    /// Missing fields fall back to the defaults, so a file may override a
    /// single knob.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read or does not contain
    /// a valid JSON geometry object.
    pub fn from_json_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(io::Error::from)
    }
}
