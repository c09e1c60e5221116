use super::types::{ChangeKind, Row};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub inserted: usize,
    pub deleted: usize,
    pub modified: usize,
    pub unchanged: usize,
}

/// Tally aligned rows.
///
/// Insertions are counted on the right side so trailing additions past the
/// end of the left document are included; everything else is read from the
/// left side, where deletions are recorded.
pub fn tally(left: &[Row], right: &[Row]) -> RowCounts {
    let mut counts = RowCounts::default();

    for (old, new) in left.iter().zip(right.iter()) {
        match old.kind {
            ChangeKind::Deleted => counts.deleted += 1,
            ChangeKind::Modified => counts.modified += 1,
            ChangeKind::Unchanged => counts.unchanged += 1,
            _ => {}
        }
        if new.kind == ChangeKind::Inserted {
            counts.inserted += 1;
        }
    }

    counts
}
