//! Row-granularity request types.
//!
//! A [`Request`] is produced once by the parser, consumed exactly once by
//! the converter, and never mutated. Reads carry their source address (the
//! primary address slot of the wire format); writes carry their target
//! address (the secondary slot, behind the `-1` marker).

/// One row-granularity memory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Row read: drain `source` onto the channel.
    Read {
        /// Source row address.
        source: u64,
        /// Stall cycles preceding the request.
        bubble: u64,
    },
    /// Row write: fill `target` from the channel.
    Write {
        /// Target row address.
        target: u64,
        /// Stall cycles preceding the request.
        bubble: u64,
    },
}

impl Request {
    /// The request's row address: source for reads, target for writes.
    #[inline]
    pub const fn row_address(&self) -> u64 {
        match self {
            Self::Read { source, .. } => *source,
            Self::Write { target, .. } => *target,
        }
    }

    /// Stall cycles attached to the request.
    #[inline]
    pub const fn bubble(&self) -> u64 {
        match self {
            Self::Read { bubble, .. } | Self::Write { bubble, .. } => *bubble,
        }
    }

    /// Whether this is a read request.
    #[inline]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}

/// One parsed trace line, including forms the converter does not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLine {
    /// A row read or write request.
    Request(Request),
    /// A pre-resolved RowClone line (`0 <source> <dest>`).
    RowClone {
        /// Source row address.
        source: u64,
        /// Destination row address.
        dest: u64,
    },
}
