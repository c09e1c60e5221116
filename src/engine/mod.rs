//! Side-by-side comparison engine.
//!
//! `compare` runs the whole pipeline: split both documents into lines, find
//! the line edit script, align it into two equal-length row sequences, diff
//! the characters of every modified row pair and tally the result.

mod align;
mod lines;
mod myers;
mod segments;
mod splitter;
mod stats;
mod types;

use std::time::Instant;
use tracing::debug;

pub use align::align;
pub use lines::{EditOp, diff_lines};
pub use segments::{Granularity, diff_segments};
pub use splitter::split;
pub use types::{ChangeKind, CharStats, ComparisonResult, Row, Segment};

/// Knobs that change how a comparison is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub granularity: Granularity,
}

/// Compare two documents with the default options.
pub fn compare(left: &str, right: &str) -> ComparisonResult {
    compare_with(left, right, &CompareOptions::default())
}

pub fn compare_with(left: &str, right: &str, options: &CompareOptions) -> ComparisonResult {
    let started = Instant::now();

    let old_lines = split(left);
    let new_lines = split(right);
    let script = diff_lines(&old_lines, &new_lines);
    let (left_rows, right_rows) = align(&script, &old_lines, &new_lines, options.granularity);
    let counts = stats::tally(&left_rows, &right_rows);

    debug!(
        left_lines = old_lines.len(),
        right_lines = new_lines.len(),
        rows = left_rows.len(),
        inserted = counts.inserted,
        deleted = counts.deleted,
        modified = counts.modified,
        elapsed_us = started.elapsed().as_micros() as u64,
        "comparison finished"
    );

    ComparisonResult {
        left_rows,
        right_rows,
        inserted_count: counts.inserted,
        deleted_count: counts.deleted,
        modified_count: counts.modified,
        unchanged_count: counts.unchanged,
    }
}
