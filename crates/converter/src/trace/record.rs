//! Converter output records.
//!
//! A [`TraceRecord`] is immutable once produced and appended to the
//! converter's output sequence. `Display` renders the wire format consumed
//! by the downstream timing simulator:
//!
//! - `<bubble> <addr>` — cache-line read
//! - `<bubble> -1 <addr>` — cache-line write
//! - `<bubble> -2 <addr>` — cache-line write, DMA-prologue flag
//! - `0 <source> <dest>` — RowClone substitution

use std::fmt;

/// One converted trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRecord {
    /// Cache-line read.
    CacheLineRead {
        /// Cache-line address.
        addr: u64,
        /// Stall cycles preceding the access.
        bubble: u64,
    },
    /// Cache-line write; `dma_prologue` marks the buffer-priming writes
    /// expanded from the first row of a matched copy window.
    CacheLineWrite {
        /// Cache-line address.
        addr: u64,
        /// Stall cycles preceding the access.
        bubble: u64,
        /// Whether this write primes the staging buffer of a copy window.
        dma_prologue: bool,
    },
    /// Bulk in-subarray row copy.
    RowClone {
        /// Source row address.
        source: u64,
        /// Destination row address.
        dest: u64,
    },
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheLineRead { addr, bubble } => write!(f, "{bubble} {addr}"),
            Self::CacheLineWrite {
                addr,
                bubble,
                dma_prologue,
            } => {
                let marker = if *dma_prologue { -2 } else { -1 };
                write!(f, "{bubble} {marker} {addr}")
            }
            Self::RowClone { source, dest } => write!(f, "0 {source} {dest}"),
        }
    }
}
