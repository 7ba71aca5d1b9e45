//! # Sliding-Window Converter Tests
//!
//! Verifies the copy-shape matcher, RowClone substitution and its
//! degenerate case, both pair-expansion orders, the single-row normal
//! path, the row budget, end-of-input flushing, and the run counters.

use std::io::Cursor;

use pretty_assertions::assert_eq;

use rctrace_core::codec::{AddressSpec, BlockLevels};
use rctrace_core::convert::{convert_reader, ConvertOptions, SlidingWindowConverter};
use rctrace_core::trace::{Request, TraceRecord};

fn spec() -> AddressSpec {
    AddressSpec::default()
}

/// Address of a row's first byte in bank 0.
fn row(spec: &AddressSpec, row: u64) -> u64 {
    spec.compose(&BlockLevels {
        bank: 0,
        row,
        column: 0,
    })
}

/// Options with substitution on and an unbounded budget.
fn opts() -> ConvertOptions {
    ConvertOptions {
        target_rows: u64::MAX,
        alternate_cachelines: true,
        row_clone: true,
    }
}

/// Fills a converter with the copy shape for source row `a`, dest row `b`.
fn fill_copy_window(conv: &mut SlidingWindowConverter<'_>, a: u64, b: u64, bubble: u64) {
    conv.add(Request::Write { target: a, bubble });
    conv.add(Request::Read {
        source: a,
        bubble: 0,
    });
    conv.add(Request::Write {
        target: b,
        bubble: 0,
    });
    conv.add(Request::Read {
        source: b,
        bubble: 0,
    });
}

fn count_reads(records: &[TraceRecord]) -> usize {
    records
        .iter()
        .filter(|r| matches!(r, TraceRecord::CacheLineRead { .. }))
        .count()
}

fn count_writes(records: &[TraceRecord], dma: bool) -> usize {
    records
        .iter()
        .filter(|r| matches!(r, TraceRecord::CacheLineWrite { dma_prologue, .. } if *dma_prologue == dma))
        .count()
}

fn count_clones(records: &[TraceRecord]) -> usize {
    records
        .iter()
        .filter(|r| matches!(r, TraceRecord::RowClone { .. }))
        .count()
}

/// Rows 100 and 924 sit in different subarrays: no substitution, full
/// expansion of all four rows (64 DMA writes + 128 alternating + 64 reads).
#[test]
fn copy_window_different_subarrays_expands_fully() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(&spec, opts());
    fill_copy_window(&mut conv, row(&spec, 100), row(&spec, 924), 9);
    conv.step();

    let records = conv.records();
    assert_eq!(records.len(), 256);
    assert_eq!(count_writes(records, true), 64);
    assert_eq!(count_clones(records), 0);
    assert_eq!(conv.stats().handled_rows, 4);
    assert_eq!(conv.stats().row_clone, 0);

    // DMA prologue first, with the original bubble on its first line only.
    assert_eq!(
        records[0],
        TraceRecord::CacheLineWrite {
            addr: row(&spec, 100),
            bubble: 9,
            dma_prologue: true
        }
    );
    assert_eq!(
        records[1],
        TraceRecord::CacheLineWrite {
            addr: row(&spec, 100) + 64,
            bubble: 0,
            dma_prologue: true
        }
    );
    // Alternating pair expansion: read/write per line, zero bubbles.
    assert_eq!(
        records[64],
        TraceRecord::CacheLineRead {
            addr: row(&spec, 100),
            bubble: 0
        }
    );
    assert_eq!(
        records[65],
        TraceRecord::CacheLineWrite {
            addr: row(&spec, 924),
            bubble: 0,
            dma_prologue: false
        }
    );
    // Trailing reads of the destination row.
    assert_eq!(
        records[192],
        TraceRecord::CacheLineRead {
            addr: row(&spec, 924),
            bubble: 0
        }
    );
}

/// Rows 100 and 101 share a subarray: one RowClone replaces the 128-line
/// pair expansion.
#[test]
fn copy_window_same_subarray_substitutes_row_clone() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(&spec, opts());
    fill_copy_window(&mut conv, row(&spec, 100), row(&spec, 101), 0);
    conv.step();

    let records = conv.records();
    assert_eq!(records.len(), 129);
    assert_eq!(count_writes(records, true), 64);
    assert_eq!(count_reads(records), 64);
    assert_eq!(
        records[64],
        TraceRecord::RowClone {
            source: row(&spec, 100),
            dest: row(&spec, 101)
        }
    );
    assert_eq!(conv.stats().row_clone, 1);
    assert_eq!(conv.stats().error_row_clone, 0);
    assert_eq!(conv.stats().handled_rows, 4);
}

/// A self-copy window is counted as degenerate and emits no clone record.
#[test]
fn degenerate_self_copy_suppressed() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(&spec, opts());
    fill_copy_window(&mut conv, row(&spec, 100), row(&spec, 100), 0);
    conv.step();

    let records = conv.records();
    assert_eq!(records.len(), 128);
    assert_eq!(count_clones(records), 0);
    assert_eq!(conv.stats().error_row_clone, 1);
    assert_eq!(conv.stats().row_clone, 0);
    assert_eq!(conv.stats().handled_rows, 4);
}

/// With substitution disabled, a same-subarray window still expands fully.
#[test]
fn substitution_disabled_expands_fully() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(
        &spec,
        ConvertOptions {
            row_clone: false,
            ..opts()
        },
    );
    fill_copy_window(&mut conv, row(&spec, 100), row(&spec, 101), 0);
    conv.step();
    assert_eq!(conv.records().len(), 256);
    assert_eq!(conv.stats().row_clone, 0);
}

/// Grouped (non-alternating) expansion keeps per-row order and bubbles.
#[test]
fn grouped_pair_expansion_orders_reads_before_writes() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(
        &spec,
        ConvertOptions {
            alternate_cachelines: false,
            ..opts()
        },
    );
    conv.add(Request::Write {
        target: row(&spec, 100),
        bubble: 0,
    });
    conv.add(Request::Read {
        source: row(&spec, 100),
        bubble: 3,
    });
    conv.add(Request::Write {
        target: row(&spec, 924),
        bubble: 2,
    });
    conv.add(Request::Read {
        source: row(&spec, 924),
        bubble: 0,
    });
    conv.step();

    let records = conv.records();
    assert_eq!(records.len(), 256);
    // Source reads first, carrying the read request's bubble.
    assert_eq!(
        records[64],
        TraceRecord::CacheLineRead {
            addr: row(&spec, 100),
            bubble: 3
        }
    );
    assert!(records[64..128]
        .iter()
        .all(|r| matches!(r, TraceRecord::CacheLineRead { .. })));
    // Then destination writes, carrying the write request's bubble.
    assert_eq!(
        records[128],
        TraceRecord::CacheLineWrite {
            addr: row(&spec, 924),
            bubble: 2,
            dma_prologue: false
        }
    );
    assert!(records[128..192].iter().all(
        |r| matches!(r, TraceRecord::CacheLineWrite { dma_prologue: false, .. })
    ));
}

/// A window that does not match pops only its oldest request.
#[test]
fn normal_path_pops_single_oldest() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(&spec, opts());
    for r in 0..4 {
        conv.add(Request::Read {
            source: row(&spec, r),
            bubble: 0,
        });
    }
    conv.step();

    assert_eq!(conv.records().len(), 64);
    assert_eq!(conv.stats().handled_rows, 1);
    assert_eq!(
        conv.records()[0],
        TraceRecord::CacheLineRead {
            addr: row(&spec, 0),
            bubble: 0
        }
    );
}

/// A matched shape with fewer than four rows of budget left takes the
/// normal path instead.
#[test]
fn copy_window_requires_remaining_budget() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(
        &spec,
        ConvertOptions {
            target_rows: 3,
            ..opts()
        },
    );
    fill_copy_window(&mut conv, row(&spec, 100), row(&spec, 101), 0);
    conv.step();
    assert_eq!(conv.stats().handled_rows, 1);
    assert_eq!(conv.stats().row_clone, 0);
    assert_eq!(conv.records().len(), 64);
}

/// Requests beyond the row budget are ignored at `add`.
#[test]
fn budget_caps_accepted_requests() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(
        &spec,
        ConvertOptions {
            target_rows: 2,
            ..opts()
        },
    );
    for r in 0..5 {
        conv.add(Request::Read {
            source: row(&spec, r),
            bubble: 0,
        });
    }
    assert_eq!(conv.stats().requests, 2);
    conv.finish();
    assert_eq!(conv.stats().handled_rows, 2);
    assert!(conv.is_finished());
    assert_eq!(conv.records().len(), 128);
}

/// A partially filled trailing window is flushed row by row.
#[test]
fn finish_flushes_partial_window() {
    let spec = spec();
    let mut conv = SlidingWindowConverter::new(&spec, opts());
    conv.add(Request::Write {
        target: row(&spec, 100),
        bubble: 0,
    });
    conv.add(Request::Read {
        source: row(&spec, 100),
        bubble: 0,
    });
    conv.add(Request::Write {
        target: row(&spec, 101),
        bubble: 0,
    });
    conv.finish();

    assert_eq!(conv.stats().handled_rows, 3);
    assert_eq!(conv.records().len(), 192);
    assert!(conv.is_empty());
}

/// End-to-end: a staged text trace through the reader and converter.
#[test]
fn convert_reader_end_to_end() {
    let spec = spec();
    let a = row(&spec, 100);
    let b = row(&spec, 101);
    let text = format!("5 -1 {a}\n0 {a}\n0 -1 {b}\n0 {b}\n");
    let conversion = convert_reader(&spec, Cursor::new(text), opts()).unwrap();

    assert_eq!(conversion.records.len(), 129);
    assert_eq!(conversion.stats.row_clone, 1);
    assert_eq!(conversion.stats.handled_rows, 4);
    assert_eq!(conversion.stats.requests, 4);
    assert_eq!(
        conversion.records[0],
        TraceRecord::CacheLineWrite {
            addr: a,
            bubble: 5,
            dma_prologue: true
        }
    );
}

/// Two back-to-back copy windows: counters track whole windows.
#[test]
fn counters_track_whole_windows() {
    let spec = spec();
    let a = row(&spec, 100);
    let b = row(&spec, 101);
    let c = row(&spec, 600);
    let d = row(&spec, 924);
    let text = format!(
        "0 -1 {a}\n0 {a}\n0 -1 {b}\n0 {b}\n0 -1 {c}\n0 {c}\n0 -1 {d}\n0 {d}\n"
    );
    let conversion = convert_reader(&spec, Cursor::new(text), opts()).unwrap();

    assert_eq!(conversion.stats.handled_rows, 8);
    // Rows 600 and 924 share the second 512-row subarray.
    assert_eq!(conversion.stats.row_clone, 2);
    assert!(conversion.stats.row_clone + conversion.stats.error_row_clone <= 2);
}

/// Output wire formats round the full record alphabet.
#[test]
fn record_wire_formats() {
    assert_eq!(
        TraceRecord::CacheLineRead {
            addr: 2048,
            bubble: 3
        }
        .to_string(),
        "3 2048"
    );
    assert_eq!(
        TraceRecord::CacheLineWrite {
            addr: 2048,
            bubble: 0,
            dma_prologue: false
        }
        .to_string(),
        "0 -1 2048"
    );
    assert_eq!(
        TraceRecord::CacheLineWrite {
            addr: 2048,
            bubble: 7,
            dma_prologue: true
        }
        .to_string(),
        "7 -2 2048"
    );
    assert_eq!(
        TraceRecord::RowClone {
            source: 100,
            dest: 200
        }
        .to_string(),
        "0 100 200"
    );
}
