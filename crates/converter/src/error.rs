//! Error types for the trace conversion pipeline.
//!
//! This module defines the error surface of the crate. It covers:
//! 1. **Configuration:** Invalid geometry derivations, fatal at construction.
//! 2. **Parsing:** Malformed trace lines, aborting the offending source.
//! 3. **Conversion:** I/O or format failures during a conversion run.
//! 4. **Batch:** Slice, worker-pool, and output failures in batch runs.
//!
//! The degenerate RowClone case (source row equals destination row inside a
//! matched copy window) is deliberately not an error type: it is recovered
//! locally by the converter and only counted.

use std::io;

use thiserror::Error;

/// Invalid DRAM geometry configuration.
///
/// Raised by [`crate::codec::AddressSpec::new`] when the derived bit
/// partition is inconsistent. Construction is the only validation point;
/// a successfully built spec never fails at decomposition time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A geometry field that feeds a log2 derivation is not a power of two.
    #[error("{field} must be a nonzero power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending configuration field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// A derived level width came out negative.
    #[error("derived {field} width is negative ({wide} wider than {narrow})")]
    NegativeWidth {
        /// Name of the derived width.
        field: &'static str,
        /// The subtrahend that exceeded the minuend.
        wide: u64,
        /// The minuend.
        narrow: u64,
    },

    /// The subarray size does not evenly divide the rows in a bank.
    #[error("subarray size {subarray_rows} does not divide rows per bank {rows_per_bank}")]
    SubarrayDivision {
        /// Configured subarray size in rows.
        subarray_rows: u64,
        /// Derived row count per bank.
        rows_per_bank: u64,
    },
}

/// Malformed trace line.
///
/// Surfaced immediately; processing of the offending input source stops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Wrong number of whitespace-separated tokens.
    #[error("trace line has {got} tokens, expected 2 or 3: {line:?}")]
    TokenCount {
        /// Observed token count.
        got: usize,
        /// The offending line.
        line: String,
    },

    /// A token did not parse as an integer of the expected sign.
    #[error("invalid integer token {token:?} in trace line")]
    InvalidInteger {
        /// The offending token.
        token: String,
    },

    /// The leading bubble count was negative.
    #[error("negative bubble count in trace line: {line:?}")]
    NegativeBubble {
        /// The offending line.
        line: String,
    },

    /// A staging expansion expected a read-then-write row pair.
    #[error("expected a read/write row pair, got: {line:?}")]
    PairOrder {
        /// The offending line.
        line: String,
    },

    /// A pre-resolved RowClone line appeared in a request-only stream.
    #[error("pre-resolved row clone not allowed in request stream: {line:?}")]
    UnexpectedRowClone {
        /// The offending line.
        line: String,
    },

    /// A pre-resolved RowClone names rows in different banks.
    #[error("row clone endpoints in different banks: {source_row:#x} vs {dest:#x}")]
    CloneBankMismatch {
        /// Source row address.
        source_row: u64,
        /// Destination row address.
        dest: u64,
    },

    /// A pre-resolved RowClone names rows in different subarrays.
    #[error("row clone endpoints in different subarrays: {source_row:#x} vs {dest:#x}")]
    CloneSubarrayMismatch {
        /// Source row address.
        source_row: u64,
        /// Destination row address.
        dest: u64,
    },

    /// A pre-resolved RowClone names the same row twice.
    #[error("row clone endpoints name the same row: {source_row:#x}")]
    CloneSameRow {
        /// The duplicated row address.
        source_row: u64,
    },
}

/// Failure of a single conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input source failed to yield a line.
    #[error("trace input failed: {0}")]
    Io(#[from] io::Error),

    /// A line failed to parse.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Failure of a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Reading the input trace or writing a slice output failed.
    #[error("batch i/o failed: {0}")]
    Io(#[from] io::Error),

    /// A slice conversion failed.
    #[error("slice conversion failed: {0}")]
    Convert(#[from] ConvertError),

    /// The bounded worker pool could not be built.
    #[error("worker pool construction failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
