//! Slice-parallel batch conversion.
//!
//! A large trace is partitioned into independent slices, each converted by
//! its own [`crate::convert::SlidingWindowConverter`] on a worker drawn from a bounded
//! pool. Slice boundaries fall on multiples of four lines so no staging
//! write/read pair is split across slices — the copy-shape matcher needs a
//! complete four-row window. Output ordering across slices is preserved by
//! index-derived file naming; the driver joins all workers before
//! returning the merged summary. The only state shared across workers is
//! the read-only [`AddressSpec`].

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

use crate::codec::AddressSpec;
use crate::convert::{convert_requests, ConvertOptions};
use crate::error::{BatchError, ConvertError};
use crate::stats::ConvertStats;
use crate::trace::parse::parse_request;
use crate::trace::record::TraceRecord;
use crate::trace::request::Request;

/// Knobs of a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Requested lines per slice; rounded down to a multiple of four.
    pub slice_len: usize,
    /// Bound on concurrently running workers.
    pub workers: usize,
    /// Per-slice conversion options.
    pub convert: ConvertOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            slice_len: 500_000,
            workers: 4,
            convert: ConvertOptions::default(),
        }
    }
}

/// Merged outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of slices written.
    pub slices: usize,
    /// Counters summed across all slices.
    pub stats: ConvertStats,
}

/// Writes one slice's records as trace lines.
fn write_records(path: &Path, records: &[TraceRecord]) -> Result<(), BatchError> {
    let file = fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    for record in records {
        writeln!(out, "{record}")?;
    }
    out.flush()?;
    Ok(())
}

/// Converts one slice of already-loaded lines.
fn convert_slice(
    spec: &AddressSpec,
    lines: &[String],
    opts: ConvertOptions,
) -> Result<(Vec<TraceRecord>, ConvertStats), ConvertError> {
    let requests = lines.iter().filter(|l| !l.trim().is_empty()).map(|line| {
        parse_request(line)
            .map(|request| match request {
                Request::Read { source, bubble } => Request::Read {
                    source: spec.mask(source),
                    bubble,
                },
                Request::Write { target, bubble } => Request::Write {
                    target: spec.mask(target),
                    bubble,
                },
            })
            .map_err(ConvertError::Format)
    });
    let conversion = convert_requests(spec, requests, opts)?;
    Ok((conversion.records, conversion.stats))
}

/// Runs a batch conversion: slice, convert on a bounded pool, persist.
///
/// Slice `i` is written to `<out_dir>/slice<i>.trace`; the directory is
/// created if absent. Returns after every worker has completed.
///
/// # Errors
///
/// Returns a [`BatchError`] if the input cannot be read, the pool cannot
/// be built, any slice fails to convert, or an output file fails to write.
pub fn run(
    spec: &AddressSpec,
    input: &Path,
    out_dir: &Path,
    opts: &BatchOptions,
) -> Result<BatchSummary, BatchError> {
    let reader = BufReader::new(fs::File::open(input)?);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
    fs::create_dir_all(out_dir)?;

    // Never split a staging pair: slice on 4-line boundaries.
    let step = (opts.slice_len - opts.slice_len % 4).max(4);
    let chunks: Vec<&[String]> = lines.chunks(step).collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.workers)
        .build()?;

    let slice_stats: Vec<ConvertStats> = pool.install(|| {
        chunks
            .par_iter()
            .enumerate()
            .map(|(index, chunk)| -> Result<ConvertStats, BatchError> {
                let (records, stats) = convert_slice(spec, chunk, opts.convert)?;
                let path: PathBuf = out_dir.join(format!("slice{index}.trace"));
                write_records(&path, &records)?;
                info!(
                    slice = index,
                    rows = stats.handled_rows,
                    row_clones = stats.row_clone,
                    degenerate = stats.error_row_clone,
                    "slice converted"
                );
                Ok(stats)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut stats = ConvertStats::default();
    for slice in &slice_stats {
        stats.merge(slice);
    }
    Ok(BatchSummary {
        slices: slice_stats.len(),
        stats,
    })
}
