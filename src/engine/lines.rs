use super::myers::{self, DiffOp};
use std::collections::HashMap;
use std::ops::Range;

/// One step of the line-level edit script. Indices are 0-based positions in
/// the respective line sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Keep { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
    /// An old line and a new line that differ but occupy the same slot.
    Replace { old: usize, new: usize },
}

/// Compute the line edit script between two documents.
///
/// Lines outside the longest common subsequence form gaps between matched
/// lines. Inside every gap the removed lines are paired with the added lines
/// position by position as `Replace`; whichever side is longer keeps its
/// surplus as plain `Delete` or `Insert` entries, deletions first.
///
/// When several common subsequences are equally long, the one picked does
/// not depend on argument order: swapping `old` and `new` swaps the roles in
/// the script and nothing else.
pub fn diff_lines(old: &[&str], new: &[&str]) -> Vec<EditOp> {
    let (old_ids, new_ids) = intern(old, new);
    let ops = myers::diff_anchored(&old_ids, &new_ids, old <= new);

    let mut script = Vec::with_capacity(old.len().max(new.len()));
    let (mut old_pos, mut new_pos) = (0, 0);

    for op in ops {
        if let DiffOp::Equal {
            old: old_start,
            new: new_start,
            len,
        } = op
        {
            push_gap(&mut script, old_pos..old_start, new_pos..new_start);
            script.extend((0..len).map(|i| EditOp::Keep {
                old: old_start + i,
                new: new_start + i,
            }));
            old_pos = old_start + len;
            new_pos = new_start + len;
        }
    }
    push_gap(&mut script, old_pos..old.len(), new_pos..new.len());

    script
}

fn push_gap(script: &mut Vec<EditOp>, removed: Range<usize>, added: Range<usize>) {
    let paired = removed.len().min(added.len());

    script.extend(
        removed
            .clone()
            .zip(added.clone())
            .map(|(old, new)| EditOp::Replace { old, new }),
    );
    script.extend(removed.skip(paired).map(|old| EditOp::Delete { old }));
    script.extend(added.skip(paired).map(|new| EditOp::Insert { new }));
}

/// Map every distinct line to a small integer so the search compares ids
/// instead of strings.
fn intern<'a>(old: &[&'a str], new: &[&'a str]) -> (Vec<u32>, Vec<u32>) {
    let mut table: HashMap<&'a str, u32> = HashMap::with_capacity(old.len() + new.len());
    let mut ids = |lines: &[&'a str]| -> Vec<u32> {
        lines
            .iter()
            .map(|&line| {
                let next = table.len() as u32;
                *table.entry(line).or_insert(next)
            })
            .collect()
    };

    let old_ids = ids(old);
    let new_ids = ids(new);
    (old_ids, new_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::EditOp::*;

    #[test]
    fn identical_documents_keep_everything() {
        let lines = ["a", "b", "c"];
        assert_eq!(
            diff_lines(&lines, &lines),
            vec![
                Keep { old: 0, new: 0 },
                Keep { old: 1, new: 1 },
                Keep { old: 2, new: 2 }
            ]
        );
    }

    #[test]
    fn pure_insertion() {
        assert_eq!(
            diff_lines(&["a", "b"], &["a", "x", "b"]),
            vec![
                Keep { old: 0, new: 0 },
                Insert { new: 1 },
                Keep { old: 1, new: 2 }
            ]
        );
    }

    #[test]
    fn pure_deletion() {
        assert_eq!(
            diff_lines(&["a", "x", "b"], &["a", "b"]),
            vec![
                Keep { old: 0, new: 0 },
                Delete { old: 1 },
                Keep { old: 2, new: 1 }
            ]
        );
    }

    #[test]
    fn equal_runs_pair_into_replacements() {
        assert_eq!(
            diff_lines(&["a", "old1", "old2", "c"], &["a", "new1", "new2", "c"]),
            vec![
                Keep { old: 0, new: 0 },
                Replace { old: 1, new: 1 },
                Replace { old: 2, new: 2 },
                Keep { old: 3, new: 3 }
            ]
        );
    }

    #[test]
    fn longer_removal_leaves_trailing_deletes() {
        assert_eq!(
            diff_lines(&["a", "x", "y", "z"], &["a", "q"]),
            vec![
                Keep { old: 0, new: 0 },
                Replace { old: 1, new: 1 },
                Delete { old: 2 },
                Delete { old: 3 }
            ]
        );
    }

    #[test]
    fn longer_addition_leaves_trailing_inserts() {
        assert_eq!(
            diff_lines(&["x", "end"], &["p", "q", "r", "end"]),
            vec![
                Replace { old: 0, new: 0 },
                Insert { new: 1 },
                Insert { new: 2 },
                Keep { old: 1, new: 3 }
            ]
        );
    }

    #[test]
    fn empty_sides() {
        assert_eq!(diff_lines(&[], &[]), vec![]);
        assert_eq!(diff_lines(&["a"], &[]), vec![Delete { old: 0 }]);
        assert_eq!(diff_lines(&[], &["a"]), vec![Insert { new: 0 }]);
    }

    #[test]
    fn replaced_lines_always_differ() {
        let old = ["fn main() {", "    a();", "    b();", "}", "", "// tail"];
        let new = ["fn main() {", "    b();", "    c();", "    a();", "}", "// tail"];
        for op in diff_lines(&old, &new) {
            if let Replace { old: o, new: n } = op {
                assert_ne!(old[o], new[n]);
            }
            if let Keep { old: o, new: n } = op {
                assert_eq!(old[o], new[n]);
            }
        }
    }

    #[test]
    fn ties_resolve_the_same_way_in_both_directions() {
        assert_eq!(
            diff_lines(&["a", "b"], &["b", "a"]),
            vec![Delete { old: 0 }, Keep { old: 1, new: 0 }, Insert { new: 1 }]
        );
        assert_eq!(
            diff_lines(&["b", "a"], &["a", "b"]),
            vec![Insert { new: 0 }, Keep { old: 0, new: 1 }, Delete { old: 1 }]
        );
    }

    #[test]
    fn every_line_is_accounted_for_once() {
        let old = ["1", "2", "3", "4", "5", "6", "7"];
        let new = ["0", "2", "3", "x", "5", "y", "z", "7", "8"];
        let script = diff_lines(&old, &new);

        let mut seen_old: Vec<usize> = Vec::new();
        let mut seen_new: Vec<usize> = Vec::new();
        for op in &script {
            match *op {
                Keep { old, new } | Replace { old, new } => {
                    seen_old.push(old);
                    seen_new.push(new);
                }
                Delete { old } => seen_old.push(old),
                Insert { new } => seen_new.push(new),
            }
        }
        assert_eq!(seen_old, (0..old.len()).collect::<Vec<_>>());
        assert_eq!(seen_new, (0..new.len()).collect::<Vec<_>>());
    }
}
