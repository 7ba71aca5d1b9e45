//! Hex-word pretty-printing.
//!
//! Renders trace addresses as 16-digit hex split into four-digit words,
//! matching the layout used when eyeballing address streams next to a
//! datasheet.

use std::io::BufRead;

use crate::error::{ConvertError, FormatError};

/// Formats a value as four space-separated hex words.
pub fn format_words(value: u64) -> String {
    let hex = format!("{value:016x}");
    hex.as_bytes()
        .chunks(4)
        .map(|word| std::str::from_utf8(word).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads one address per line and returns each formatted as hex words.
///
/// # Errors
///
/// Returns a [`ConvertError`] on I/O failure or a non-integer line.
pub fn dump<R: BufRead>(reader: R) -> Result<Vec<String>, ConvertError> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        let value: u64 = token.parse().map_err(|_| {
            ConvertError::Format(FormatError::InvalidInteger {
                token: token.to_owned(),
            })
        })?;
        out.push(format_words(value));
    }
    Ok(out)
}
