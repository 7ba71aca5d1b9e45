//! Trace line model.
//!
//! Everything that crosses the converter's input and output boundaries
//! lives here:
//! 1. **Requests:** Row-granularity read/write requests and the wider
//!    trace-line sum type that also admits pre-resolved RowClones.
//! 2. **Records:** The converter's output records and their wire formats.
//! 3. **Parsing:** Strict request parsing and permissive trace-line parsing.
//! 4. **Reading:** A buffered line reader with address masking, carried
//!    bubble counts, and an explicit end-of-sequence signal.

/// Request parsing (strict) and trace-line parsing (permissive).
pub mod parse;

/// Buffered trace reading.
pub mod reader;

/// Output record types and wire formats.
pub mod record;

/// Request and trace-line types.
pub mod request;

pub use parse::{parse_line, parse_request};
pub use reader::TraceReader;
pub use record::TraceRecord;
pub use request::{Request, TraceLine};
