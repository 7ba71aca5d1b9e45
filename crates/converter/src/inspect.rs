//! Trace inspection.
//!
//! Renders each trace line as its decomposed level vector, the view used
//! to sanity-check a trace against the configured geometry before feeding
//! it to a timing simulator. Pre-resolved RowClone lines are additionally
//! validated: both endpoints must share a bank and a subarray and must
//! name distinct rows.

use std::io::BufRead;

use crate::codec::AddressSpec;
use crate::error::{ConvertError, FormatError};
use crate::trace::parse::parse_line;
use crate::trace::request::{Request, TraceLine};

/// Describes one trace line as a decomposed level vector.
///
/// # Errors
///
/// Returns a [`FormatError`] for malformed lines and for RowClone lines
/// whose endpoints violate the same-bank/same-subarray/distinct-row rules.
pub fn describe_line(spec: &AddressSpec, line: &str) -> Result<String, FormatError> {
    match parse_line(line)? {
        TraceLine::Request(Request::Read { source, .. }) => {
            let levels = spec.decompose(spec.mask(source));
            Ok(format!("[RD]> {levels}"))
        }
        TraceLine::Request(Request::Write { target, .. }) => {
            let levels = spec.decompose(spec.mask(target));
            Ok(format!("[WR]> {levels}"))
        }
        TraceLine::RowClone { source, dest } => {
            let source = spec.mask(source);
            let dest = spec.mask(dest);
            let from = spec.decompose(source);
            let to = spec.decompose(dest);
            if from.bank != to.bank {
                return Err(FormatError::CloneBankMismatch {
                    source_row: source,
                    dest,
                });
            }
            if spec.subarray_index_of(source) != spec.subarray_index_of(dest) {
                return Err(FormatError::CloneSubarrayMismatch {
                    source_row: source,
                    dest,
                });
            }
            if from.row == to.row {
                return Err(FormatError::CloneSameRow { source_row: source });
            }
            Ok(format!(
                "[RC]> {from} to {to} >> bank-sub-row [{},{},{}] to [{},{},{}]",
                from.bank,
                spec.subarray_index_of(source),
                from.row,
                to.bank,
                spec.subarray_index_of(dest),
                to.row
            ))
        }
    }
}

/// Describes every line of a trace source.
///
/// # Errors
///
/// Stops at and returns the first I/O or format failure.
pub fn describe<R: BufRead>(spec: &AddressSpec, reader: R) -> Result<Vec<String>, ConvertError> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(describe_line(spec, &line)?);
    }
    Ok(out)
}
