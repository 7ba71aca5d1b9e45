//! Staging expansion.
//!
//! Rewrites a row-pair trace (alternating read and write lines) into the
//! four-line staging shape the copy-shape matcher consumes: each
//! read/write pair gains a zero-bubble staging write of the read's row
//! before it and a zero-bubble staging read of the write's row after it.
//!
//! ```text
//! 0 <rd>            0 -1 <rd>
//! 0 -1 <wr>   =>    0 <rd>
//!                   0 -1 <wr>
//!                   0 <wr>
//! ```

use std::io::{BufRead, Write};

use crate::error::{ConvertError, FormatError};
use crate::trace::parse::parse_request;
use crate::trace::record::TraceRecord;
use crate::trace::request::Request;

/// Expands read/write row pairs into the four-line staging shape.
///
/// Input lines pass through verbatim; only the staging lines are
/// synthesized. A trailing read without its write partner is dropped,
/// matching end-of-pair truncation. Returns the number of pairs expanded.
///
/// # Errors
///
/// Returns a [`ConvertError`] on I/O failure, a malformed line, or a pair
/// whose ops are not read-then-write.
pub fn expand4<R: BufRead, W: Write>(reader: R, mut out: W) -> Result<u64, ConvertError> {
    let mut lines = reader.lines().filter(|l| match l {
        Ok(line) => !line.trim().is_empty(),
        Err(_) => true,
    });
    let mut pairs = 0u64;
    while let Some(read_line) = lines.next() {
        let read_line = read_line?;
        let Some(write_line) = lines.next() else {
            break;
        };
        let write_line = write_line?;

        let Request::Read { source, .. } = parse_request(&read_line)? else {
            return Err(ConvertError::Format(FormatError::PairOrder {
                line: read_line,
            }));
        };
        let Request::Write { target, .. } = parse_request(&write_line)? else {
            return Err(ConvertError::Format(FormatError::PairOrder {
                line: write_line,
            }));
        };

        writeln!(
            out,
            "{}",
            TraceRecord::CacheLineWrite {
                addr: source,
                bubble: 0,
                dma_prologue: false,
            }
        )?;
        writeln!(out, "{}", read_line.trim())?;
        writeln!(out, "{}", write_line.trim())?;
        writeln!(
            out,
            "{}",
            TraceRecord::CacheLineRead {
                addr: target,
                bubble: 0,
            }
        )?;
        pairs += 1;
    }
    out.flush()?;
    Ok(pairs)
}
