//! Sliding-window converter core.
//!
//! The converter buffers up to four pending row requests and decides, per
//! window, between two paths:
//!
//! 1. **Copy window** — the window holds exactly
//!    `[Write(A), Read(A), Write(B), Read(B)]`: row A drained through a
//!    staging write/read pair, immediately followed by a disjoint row B
//!    drained the same way. The first row expands into DMA-prologue writes;
//!    the inner source/destination pair becomes either one RowClone record
//!    (same subarray, substitution enabled) or a full two-row cache-line
//!    expansion; the last row expands into plain reads.
//! 2. **Normal path** — anything else pops only the single oldest request
//!    and expands it alone, keeping the remaining requests buffered.
//!
//! The state machine is single-threaded, synchronous, and purely CPU-bound;
//! it owns nothing beyond its window, output sequence, and counters.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::{debug, warn};

use crate::codec::AddressSpec;
use crate::error::ConvertError;
use crate::stats::ConvertStats;
use crate::trace::reader::TraceReader;
use crate::trace::record::TraceRecord;
use crate::trace::request::Request;

/// Requests per decision window.
const WINDOW_ROWS: usize = 4;

/// Knobs of one conversion run.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Row budget: requests beyond this count are ignored and the run is
    /// finished once this many rows are handled.
    pub target_rows: u64,
    /// Interleave the source/destination pair read/write/read/… instead of
    /// grouping all reads before all writes.
    pub alternate_cachelines: bool,
    /// Substitute same-subarray copy windows with RowClone records.
    pub row_clone: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target_rows: u64::MAX,
            alternate_cachelines: false,
            row_clone: true,
        }
    }
}

/// The result of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Output record sequence, in emission order.
    pub records: Vec<TraceRecord>,
    /// Run counters.
    pub stats: ConvertStats,
}

/// Four-slot sliding-window trace converter.
///
/// Owned by exactly one conversion run; the only shared input is the
/// read-only [`AddressSpec`].
#[derive(Debug)]
pub struct SlidingWindowConverter<'a> {
    spec: &'a AddressSpec,
    opts: ConvertOptions,
    window: VecDeque<Request>,
    records: Vec<TraceRecord>,
    stats: ConvertStats,
}

impl<'a> SlidingWindowConverter<'a> {
    /// Creates a converter with empty window and zeroed counters.
    pub fn new(spec: &'a AddressSpec, opts: ConvertOptions) -> Self {
        Self {
            spec,
            opts,
            window: VecDeque::with_capacity(WINDOW_ROWS),
            records: Vec::new(),
            stats: ConvertStats::default(),
        }
    }

    /// Whether the window holds a full decision's worth of requests.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.window.len() >= WINDOW_ROWS
    }

    /// Whether the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Whether the row budget has been exhausted.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        self.stats.handled_rows >= self.opts.target_rows
    }

    /// Appends a request to the window.
    ///
    /// No-op once the accepted-row count reaches the budget or the window
    /// already holds a full decision.
    pub fn add(&mut self, request: Request) {
        if self.stats.requests >= self.opts.target_rows || self.is_full() {
            return;
        }
        self.window.push_back(request);
        self.stats.requests += 1;
    }

    /// Runs one window decision: copy-window handling when the shape
    /// matches and at least four rows remain in budget, otherwise a
    /// single-row expansion of the oldest request.
    pub fn step(&mut self) {
        if self.is_copy_window() && self.stats.handled_rows + 4 <= self.opts.target_rows {
            self.handle_copy_window();
        } else {
            self.handle_oldest();
        }
    }

    /// Drains whatever remains in the window at end of input.
    ///
    /// Each step consumes at least one request, so this terminates with an
    /// empty window and `handled_rows` equal to the accepted count.
    pub fn finish(&mut self) {
        while !self.is_empty() {
            self.step();
        }
        debug!(
            requests = self.stats.requests,
            handled = self.stats.handled_rows,
            row_clones = self.stats.row_clone,
            degenerate = self.stats.error_row_clone,
            "conversion finished"
        );
    }

    /// Consumes the converter, yielding records and counters.
    pub fn into_conversion(self) -> Conversion {
        Conversion {
            records: self.records,
            stats: self.stats,
        }
    }

    /// Borrow of the output records emitted so far.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Borrow of the run counters.
    pub const fn stats(&self) -> &ConvertStats {
        &self.stats
    }

    /// Whether the full window matches the copy shape:
    /// `[Write(A), Read(A), Write(B), Read(B)]` with each write's target
    /// equal to the following read's source.
    fn is_copy_window(&self) -> bool {
        if !self.is_full() {
            return false;
        }
        let staged_pair = |w: &Request, r: &Request| match (w, r) {
            (Request::Write { target, .. }, Request::Read { source, .. }) => target == source,
            _ => false,
        };
        staged_pair(&self.window[0], &self.window[1])
            && staged_pair(&self.window[2], &self.window[3])
    }

    /// Expands one row request into per-cache-line records of its own op.
    ///
    /// The row's low column/byte bits are cleared and one record per column
    /// is emitted at consecutive transaction offsets; the bubble delay
    /// attaches only to the first line.
    fn expand_row(&mut self, request: &Request, dma_prologue: bool) {
        let row = request.row_address();
        for index in 0..self.spec.cache_lines_per_row() {
            let bubble = if index == 0 { request.bubble() } else { 0 };
            let addr = self.spec.line_address(row, index);
            let record = if request.is_read() {
                TraceRecord::CacheLineRead { addr, bubble }
            } else {
                TraceRecord::CacheLineWrite {
                    addr,
                    bubble,
                    dma_prologue,
                }
            };
            self.records.push(record);
        }
    }

    /// Expands the source-read/destination-write pair of an unsubstituted
    /// copy window into two rows' worth of cache-line records.
    ///
    /// Grouped mode expands each row in turn (bubbles on first lines);
    /// alternating mode interleaves read/write per line with zero bubbles.
    fn expand_pair(&mut self, source_read: &Request, dest_write: &Request) {
        if !self.opts.alternate_cachelines {
            self.expand_row(source_read, false);
            self.expand_row(dest_write, false);
            return;
        }
        let source = source_read.row_address();
        let dest = dest_write.row_address();
        for index in 0..self.spec.cache_lines_per_row() {
            self.records.push(TraceRecord::CacheLineRead {
                addr: self.spec.line_address(source, index),
                bubble: 0,
            });
            self.records.push(TraceRecord::CacheLineWrite {
                addr: self.spec.line_address(dest, index),
                bubble: 0,
                dma_prologue: false,
            });
        }
    }

    /// Handles a matched copy window and clears it atomically.
    fn handle_copy_window(&mut self) {
        // Window shape is guaranteed by is_copy_window.
        let prologue = self.window[0];
        let source_read = self.window[1];
        let dest_write = self.window[2];
        let trailing_read = self.window[3];

        self.expand_row(&prologue, true);

        let source = source_read.row_address();
        let dest = dest_write.row_address();
        if self.opts.row_clone && self.spec.same_subarray(source, dest) {
            if source == dest {
                // Degenerate self-copy: recovered locally, nothing emitted.
                warn!(addr = source, "degenerate row clone suppressed");
                self.stats.error_row_clone += 1;
            } else {
                self.records.push(TraceRecord::RowClone { source, dest });
                self.stats.row_clone += 1;
            }
        } else {
            self.expand_pair(&source_read, &dest_write);
        }

        self.expand_row(&trailing_read, false);

        self.window.clear();
        self.stats.handled_rows += 4;
    }

    /// Expands only the oldest request, keeping the rest buffered.
    fn handle_oldest(&mut self) {
        if let Some(request) = self.window.pop_front() {
            self.expand_row(&request, false);
            self.stats.handled_rows += 1;
        }
    }
}

/// Converts a full request stream to completion.
///
/// Fills the window from `requests`, stepping on each full window, until
/// the budget is exhausted or the stream ends; a partially filled trailing
/// window is flushed through the normal per-row path.
///
/// # Errors
///
/// Propagates the first [`ConvertError`] the stream yields; nothing after
/// the failing line is processed.
pub fn convert_requests<I>(
    spec: &AddressSpec,
    requests: I,
    opts: ConvertOptions,
) -> Result<Conversion, ConvertError>
where
    I: IntoIterator<Item = Result<Request, ConvertError>>,
{
    let mut converter = SlidingWindowConverter::new(spec, opts);
    let mut requests = requests.into_iter();
    'fill: loop {
        while !converter.is_full() {
            if converter.is_finished() {
                break 'fill;
            }
            match requests.next() {
                Some(Ok(request)) => converter.add(request),
                Some(Err(e)) => return Err(e),
                None => break 'fill,
            }
        }
        converter.step();
    }
    converter.finish();
    Ok(converter.into_conversion())
}

/// Converts a buffered line source to completion.
///
/// # Errors
///
/// Propagates I/O and format errors from the reader.
pub fn convert_reader<R: BufRead>(
    spec: &AddressSpec,
    reader: R,
    opts: ConvertOptions,
) -> Result<Conversion, ConvertError> {
    convert_requests(spec, TraceReader::new(spec, reader), opts)
}
