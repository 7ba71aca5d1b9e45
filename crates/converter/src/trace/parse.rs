//! Trace line parsing.
//!
//! Two entry points share one tokenizer:
//! - [`parse_request`] implements the strict request contract: two tokens
//!   form a read, three tokens with a `-1` marker form a write, and
//!   anything else — including a pre-resolved RowClone — is a
//!   [`FormatError`]. The converter's input goes through this path.
//! - [`parse_line`] additionally admits the pre-resolved RowClone form
//!   (`0 <source> <dest>`) for the inspection tools.
//!
//! Results are tagged, never thrown: every malformed line surfaces as
//! `Err(FormatError)` and aborts the offending source at the caller.

use crate::error::FormatError;
use crate::trace::request::{Request, TraceLine};

/// Parses the leading bubble-count token, rejecting negatives.
fn parse_bubble(token: &str, line: &str) -> Result<u64, FormatError> {
    let signed: i64 = token.parse().map_err(|_| FormatError::InvalidInteger {
        token: token.to_owned(),
    })?;
    u64::try_from(signed).map_err(|_| FormatError::NegativeBubble {
        line: line.to_owned(),
    })
}

/// Parses an address token as an unsigned integer.
fn parse_addr(token: &str) -> Result<u64, FormatError> {
    token.parse().map_err(|_| FormatError::InvalidInteger {
        token: token.to_owned(),
    })
}

/// Parses one whitespace-tokenized trace line into a request or a
/// pre-resolved RowClone.
///
/// # Errors
///
/// Returns a [`FormatError`] on a wrong token count, a non-integer token,
/// or a negative bubble count.
pub fn parse_line(line: &str) -> Result<TraceLine, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [bubble, addr] => {
            let bubble = parse_bubble(bubble, line)?;
            let source = parse_addr(addr)?;
            Ok(TraceLine::Request(Request::Read { source, bubble }))
        }
        [bubble, "-1", addr] => {
            let bubble = parse_bubble(bubble, line)?;
            let target = parse_addr(addr)?;
            Ok(TraceLine::Request(Request::Write { target, bubble }))
        }
        [bubble, source, dest] => {
            // Three tokens without the write marker: a pre-resolved clone.
            let _ = parse_bubble(bubble, line)?;
            let source = parse_addr(source)?;
            let dest = parse_addr(dest)?;
            Ok(TraceLine::RowClone { source, dest })
        }
        _ => Err(FormatError::TokenCount {
            got: tokens.len(),
            line: line.to_owned(),
        }),
    }
}

/// Parses one trace line into a row request, rejecting every other form.
///
/// # Errors
///
/// Returns a [`FormatError`] as [`parse_line`] does, plus
/// [`FormatError::UnexpectedRowClone`] for a pre-resolved RowClone line.
pub fn parse_request(line: &str) -> Result<Request, FormatError> {
    match parse_line(line)? {
        TraceLine::Request(request) => Ok(request),
        TraceLine::RowClone { .. } => Err(FormatError::UnexpectedRowClone {
            line: line.to_owned(),
        }),
    }
}
