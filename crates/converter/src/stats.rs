//! Conversion statistics collection and reporting.
//!
//! [`ConvertStats`] tracks the counters of one converter run: accepted
//! requests, handled rows, RowClone substitutions, and degenerate
//! substitutions that were suppressed. Counters reset only at construction;
//! the batch driver merges per-slice stats into a run total.

/// Counters scoped to one converter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Row requests accepted into the window.
    pub requests: u64,
    /// Rows fully handled (expanded or substituted).
    pub handled_rows: u64,
    /// RowClone records emitted.
    pub row_clone: u64,
    /// Matched copy windows whose source row equalled the destination row;
    /// counted, no record emitted.
    pub error_row_clone: u64,
}

impl ConvertStats {
    /// Folds another run's counters into this one.
    pub fn merge(&mut self, other: &Self) {
        self.requests += other.requests;
        self.handled_rows += other.handled_rows;
        self.row_clone += other.row_clone;
        self.error_row_clone += other.error_row_clone;
    }

    /// Prints a human-readable report to stdout.
    pub fn print(&self) {
        println!("=== Conversion Statistics ===");
        println!("  Requests accepted : {}", self.requests);
        println!("  Rows handled      : {}", self.handled_rows);
        println!("  RowClones emitted : {}", self.row_clone);
        println!("  Degenerate clones : {}", self.error_row_clone);
        if self.handled_rows > 0 {
            let quarter_windows = self.handled_rows / 4;
            println!(
                "  Substitution rate : {:.2}% of possible windows",
                if quarter_windows == 0 {
                    0.0
                } else {
                    100.0 * (self.row_clone + self.error_row_clone) as f64
                        / quarter_windows as f64
                }
            );
        }
    }
}
