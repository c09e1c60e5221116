use super::lines::EditOp;
use super::segments::{Granularity, diff_segments};
use super::types::{ChangeKind, Row};

/// Turn a line edit script into two index-aligned row sequences.
///
/// Every script entry produces exactly one row on each side, so the two
/// outputs always have the same length. Line numbers are 1-based and count
/// only the real rows of their own side.
pub fn align(
    script: &[EditOp],
    old: &[&str],
    new: &[&str],
    granularity: Granularity,
) -> (Vec<Row>, Vec<Row>) {
    let mut left = Vec::with_capacity(script.len());
    let mut right = Vec::with_capacity(script.len());

    for op in script {
        match *op {
            EditOp::Keep { old: o, new: n } => {
                left.push(Row::real(o + 1, old[o], ChangeKind::Unchanged));
                right.push(Row::real(n + 1, new[n], ChangeKind::Unchanged));
            }
            EditOp::Replace { old: o, new: n } => {
                let (left_segments, right_segments) = diff_segments(old[o], new[n], granularity);
                left.push(Row::modified(o + 1, old[o], left_segments));
                right.push(Row::modified(n + 1, new[n], right_segments));
            }
            EditOp::Delete { old: o } => {
                left.push(Row::real(o + 1, old[o], ChangeKind::Deleted));
                right.push(Row::imaginary());
            }
            EditOp::Insert { new: n } => {
                left.push(Row::imaginary());
                right.push(Row::real(n + 1, new[n], ChangeKind::Inserted));
            }
        }
    }

    (left, right)
}
