//! RowClone trace conversion library.
//!
//! This crate restructures offline row-granularity DRAM access traces into
//! cache-line-granularity traces, substituting same-subarray copy patterns
//! with bulk RowClone commands. It provides:
//! 1. **Geometry:** Configurable DRAM geometry and its derived bit partition.
//! 2. **Codec:** Deterministic address decomposition/composition over bank,
//!    row, column, and byte fields.
//! 3. **Conversion:** The four-slot sliding-window state machine that
//!    recognizes the copy shape and emits cache-line or RowClone records.
//! 4. **Batch:** Slice-parallel conversion of large traces with per-slice
//!    output files.
//! 5. **Tools:** Trace staging expansion, level-vector inspection, hex
//!    dumps, and a DDR energy estimate.

/// Slice-parallel batch conversion driver.
pub mod batch;
/// Address decomposition/composition codec and derived geometry.
pub mod codec;
/// DRAM geometry configuration (defaults, serde structures, JSON loading).
pub mod config;
/// Sliding-window converter core.
pub mod convert;
/// DDR energy estimation for converted traces.
pub mod energy;
/// Error types for configuration, parsing, conversion, and batch runs.
pub mod error;
/// Staging expansion of row-pair traces into the four-line copy shape.
pub mod expand;
/// Hex-word pretty-printing of trace addresses.
pub mod hex;
/// Level-vector inspection and pre-resolved RowClone validation.
pub mod inspect;
/// Conversion statistics collection and reporting.
pub mod stats;
/// Trace line model: requests, records, parsing, and buffered reading.
pub mod trace;

/// Derived address partition; construct with [`AddressSpec::new`].
pub use crate::codec::AddressSpec;
/// Raw geometry; use `GeometryConfig::default()` or deserialize from JSON.
pub use crate::config::GeometryConfig;
/// Converter core; feed [`trace::Request`] values and collect records.
pub use crate::convert::{ConvertOptions, SlidingWindowConverter};
/// Per-run counters; merged across slices by the batch driver.
pub use crate::stats::ConvertStats;
