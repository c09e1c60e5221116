//! Longest-common-subsequence search shared by the line and segment differs.
//!
//! This is Myers' O(ND) algorithm in its linear-space form: the middle snake
//! of the optimal path is located by running the greedy search from both ends
//! at once, and the two halves on either side of it are solved recursively.
//! Common prefixes and suffixes are peeled off before every search, and a
//! range pair with no element in common is emitted without searching.
//!
//! Elements that occur on only one side can never be matched, so they are
//! dropped before the search and put back afterwards. A rewritten document
//! then costs a hash lookup per line instead of a full O(ND) walk.

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    Equal { old: usize, new: usize, len: usize },
    Delete { old: usize, len: usize },
    Insert { new: usize, len: usize },
}

impl DiffOp {
    /// The same operation seen from the other side.
    fn flipped(self) -> Self {
        match self {
            DiffOp::Equal { old, new, len } => DiffOp::Equal {
                old: new,
                new: old,
                len,
            },
            DiffOp::Delete { old, len } => DiffOp::Insert { new: old, len },
            DiffOp::Insert { new, len } => DiffOp::Delete { old: new, len },
        }
    }
}

/// Compute a minimal edit script turning `old` into `new`.
///
/// Adjacent operations of the same kind are merged, so an `Equal` run is
/// always maximal within the script.
pub fn diff<T: Eq + Hash>(old: &[T], new: &[T]) -> Vec<DiffOp> {
    let old_shared = shared_positions(old, new);
    let new_shared = shared_positions(new, old);

    if old_shared.len() == old.len() && new_shared.len() == new.len() {
        return search(old, new);
    }

    let old_kept: Vec<&T> = old_shared.iter().map(|&i| &old[i]).collect();
    let new_kept: Vec<&T> = new_shared.iter().map(|&i| &new[i]).collect();
    let matched = search(&old_kept, &new_kept);

    let mut ops = Vec::with_capacity(matched.len() * 2 + 2);
    let (mut old_pos, mut new_pos) = (0, 0);
    for op in matched {
        let DiffOp::Equal { old: o, new: n, len } = op else {
            continue;
        };
        for i in 0..len {
            let (x, y) = (old_shared[o + i], new_shared[n + i]);
            if x > old_pos {
                push(
                    &mut ops,
                    DiffOp::Delete {
                        old: old_pos,
                        len: x - old_pos,
                    },
                );
            }
            if y > new_pos {
                push(
                    &mut ops,
                    DiffOp::Insert {
                        new: new_pos,
                        len: y - new_pos,
                    },
                );
            }
            push(
                &mut ops,
                DiffOp::Equal {
                    old: x,
                    new: y,
                    len: 1,
                },
            );
            old_pos = x + 1;
            new_pos = y + 1;
        }
    }
    if old_pos < old.len() {
        push(
            &mut ops,
            DiffOp::Delete {
                old: old_pos,
                len: old.len() - old_pos,
            },
        );
    }
    if new_pos < new.len() {
        push(
            &mut ops,
            DiffOp::Insert {
                new: new_pos,
                len: new.len() - new_pos,
            },
        );
    }

    ops
}

/// Like [`diff`], but the search runs from `new` to `old` when `old_first` is
/// false and the script is flipped back afterwards.
///
/// Among equally long common subsequences the search always settles on the
/// same one for a given argument order. Deriving `old_first` from a total
/// order on the two inputs therefore makes `(a, b)` and `(b, a)` produce
/// mirror-image scripts.
pub fn diff_anchored<T: Eq + Hash>(old: &[T], new: &[T], old_first: bool) -> Vec<DiffOp> {
    if old_first {
        diff(old, new)
    } else {
        diff(new, old).into_iter().map(DiffOp::flipped).collect()
    }
}

fn search<T: Eq + Hash>(old: &[T], new: &[T]) -> Vec<DiffOp> {
    let mut search = Search {
        old,
        new,
        forward: Vec::new(),
        backward: Vec::new(),
        ops: Vec::new(),
    };
    search.conquer(0..old.len(), 0..new.len());
    search.ops
}

/// Positions in `side` whose element also occurs somewhere in `other`.
fn shared_positions<T: Eq + Hash>(side: &[T], other: &[T]) -> Vec<usize> {
    let present: HashSet<&T> = other.iter().collect();
    (0..side.len()).filter(|&i| present.contains(&side[i])).collect()
}

fn have_common_element<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let present: HashSet<&T> = small.iter().collect();
    large.iter().any(|item| present.contains(item))
}

struct Search<'a, T> {
    old: &'a [T],
    new: &'a [T],
    forward: Vec<isize>,
    backward: Vec<isize>,
    ops: Vec<DiffOp>,
}

impl<T: Eq + Hash> Search<'_, T> {
    fn conquer(&mut self, mut old: Range<usize>, mut new: Range<usize>) {
        let prefix = common_prefix_len(&self.old[old.clone()], &self.new[new.clone()]);
        if prefix > 0 {
            self.push(DiffOp::Equal {
                old: old.start,
                new: new.start,
                len: prefix,
            });
            old.start += prefix;
            new.start += prefix;
        }

        let suffix = common_suffix_len(&self.old[old.clone()], &self.new[new.clone()]);
        old.end -= suffix;
        new.end -= suffix;

        if old.is_empty() && new.is_empty() {
            // fully matched
        } else if old.is_empty() {
            self.push(DiffOp::Insert {
                new: new.start,
                len: new.len(),
            });
        } else if new.is_empty() {
            self.push(DiffOp::Delete {
                old: old.start,
                len: old.len(),
            });
        } else if !have_common_element(&self.old[old.clone()], &self.new[new.clone()]) {
            self.push(DiffOp::Delete {
                old: old.start,
                len: old.len(),
            });
            self.push(DiffOp::Insert {
                new: new.start,
                len: new.len(),
            });
        } else if let Some((x, y)) = self.middle_snake(old.clone(), new.clone()) {
            self.conquer(old.start..x, new.start..y);
            self.conquer(x..old.end, y..new.end);
        } else {
            self.push(DiffOp::Delete {
                old: old.start,
                len: old.len(),
            });
            self.push(DiffOp::Insert {
                new: new.start,
                len: new.len(),
            });
        }

        if suffix > 0 {
            self.push(DiffOp::Equal {
                old: old.end,
                new: new.end,
                len: suffix,
            });
        }
    }

    /// Find a point on an optimal path that splits the problem in two.
    ///
    /// `forward[k]` holds the furthest x reached on diagonal `k = x - y`
    /// from the top-left corner, `backward[k]` the same measured from the
    /// bottom-right corner. Returns absolute indices into `old` and `new`.
    fn middle_snake(&mut self, old: Range<usize>, new: Range<usize>) -> Option<(usize, usize)> {
        let n = old.len() as isize;
        let m = new.len() as isize;
        let max_d = (n + m + 1) / 2;
        let offset = max_d;
        let width = 2 * max_d + 2;
        let delta = n - m;
        let odd = delta % 2 != 0;

        reset(&mut self.forward, width as usize);
        reset(&mut self.backward, width as usize);
        self.forward[(offset + 1) as usize] = 0;
        self.backward[(offset + 1) as usize] = 0;

        let (a, b) = (&self.old[old.clone()], &self.new[new.clone()]);
        let in_bounds = |index: isize| index >= 0 && index < width;

        // diagonals that ran off the grid are skipped on later rounds
        let (mut fwd_start, mut fwd_end) = (0, 0);
        let (mut bwd_start, mut bwd_end) = (0, 0);

        for d in 0..max_d {
            let mut k = -d + fwd_start;
            while k <= d - fwd_end {
                let at = (offset + k) as usize;
                let mut x = if k == -d || (k != d && self.forward[at - 1] < self.forward[at + 1]) {
                    self.forward[at + 1]
                } else {
                    self.forward[at - 1] + 1
                };
                let mut y = x - k;
                while x < n && y < m && a[x as usize] == b[y as usize] {
                    x += 1;
                    y += 1;
                }
                self.forward[at] = x;

                if x > n {
                    fwd_end += 2;
                } else if y > m {
                    fwd_start += 2;
                } else if odd {
                    let mirror = offset + delta - k;
                    if in_bounds(mirror) && self.backward[mirror as usize] != -1 {
                        let reached = n - self.backward[mirror as usize];
                        if x >= reached {
                            return Some((old.start + x as usize, new.start + y as usize));
                        }
                    }
                }
                k += 2;
            }

            let mut k = -d + bwd_start;
            while k <= d - bwd_end {
                let at = (offset + k) as usize;
                let mut x = if k == -d || (k != d && self.backward[at - 1] < self.backward[at + 1])
                {
                    self.backward[at + 1]
                } else {
                    self.backward[at - 1] + 1
                };
                let mut y = x - k;
                while x < n && y < m && a[(n - x - 1) as usize] == b[(m - y - 1) as usize] {
                    x += 1;
                    y += 1;
                }
                self.backward[at] = x;

                if x > n {
                    bwd_end += 2;
                } else if y > m {
                    bwd_start += 2;
                } else if !odd {
                    let mirror = offset + delta - k;
                    if in_bounds(mirror) && self.forward[mirror as usize] != -1 {
                        let fx = self.forward[mirror as usize];
                        let fy = fx - (mirror - offset);
                        if fx <= n && (0..=m).contains(&fy) && fx >= n - x {
                            return Some((old.start + fx as usize, new.start + fy as usize));
                        }
                    }
                }
                k += 2;
            }
        }

        None
    }

    fn push(&mut self, op: DiffOp) {
        push(&mut self.ops, op);
    }
}

/// Append `op`, extending the last operation when the two are contiguous.
fn push(ops: &mut Vec<DiffOp>, op: DiffOp) {
    if let Some(last) = ops.last_mut() {
        match (last, op) {
            (
                DiffOp::Equal { old, new, len },
                DiffOp::Equal {
                    old: next_old,
                    new: next_new,
                    len: more,
                },
            ) if *old + *len == next_old && *new + *len == next_new => {
                *len += more;
                return;
            }
            (DiffOp::Delete { old, len }, DiffOp::Delete { old: next, len: more })
                if *old + *len == next =>
            {
                *len += more;
                return;
            }
            (DiffOp::Insert { new, len }, DiffOp::Insert { new: next, len: more })
                if *new + *len == next =>
            {
                *len += more;
                return;
            }
            _ => {}
        }
    }
    ops.push(op);
}

fn reset(v: &mut Vec<isize>, width: usize) {
    v.clear();
    v.resize(width, -1);
}

fn common_prefix_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use similar::{Algorithm, ChangeTag, TextDiff};
    use std::fmt::Debug;
    use std::time::{Duration, Instant};

    fn common_len(ops: &[DiffOp]) -> usize {
        ops.iter()
            .map(|op| match op {
                DiffOp::Equal { len, .. } => *len,
                _ => 0,
            })
            .sum()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// Replay the script and check it rebuilds both inputs.
    fn assert_script_valid<T: PartialEq + Clone + Debug>(old: &[T], new: &[T], ops: &[DiffOp]) {
        let (mut rebuilt_old, mut rebuilt_new) = (Vec::new(), Vec::new());
        for op in ops {
            match *op {
                DiffOp::Equal { old: o, new: n, len } => {
                    assert_eq!(&old[o..o + len], &new[n..n + len]);
                    rebuilt_old.extend_from_slice(&old[o..o + len]);
                    rebuilt_new.extend_from_slice(&new[n..n + len]);
                }
                DiffOp::Delete { old: o, len } => rebuilt_old.extend_from_slice(&old[o..o + len]),
                DiffOp::Insert { new: n, len } => rebuilt_new.extend_from_slice(&new[n..n + len]),
            }
        }
        assert_eq!(rebuilt_old, old);
        assert_eq!(rebuilt_new, new);

        for pair in ops.windows(2) {
            let merged = match (pair[0], pair[1]) {
                (DiffOp::Equal { old, new, len }, DiffOp::Equal { old: o, new: n, .. }) => {
                    old + len == o && new + len == n
                }
                (DiffOp::Delete { old, len }, DiffOp::Delete { old: o, .. }) => old + len == o,
                (DiffOp::Insert { new, len }, DiffOp::Insert { new: n, .. }) => new + len == n,
                _ => false,
            };
            assert!(!merged, "unmerged neighbours {:?}", pair);
        }
    }

    /// Textbook dynamic-programming LCS length.
    fn lcs_len<T: PartialEq>(old: &[T], new: &[T]) -> usize {
        let mut row = vec![0usize; new.len() + 1];
        for a in old {
            let mut diagonal = 0;
            for (j, b) in new.iter().enumerate() {
                let above = row[j + 1];
                row[j + 1] = if a == b {
                    diagonal + 1
                } else {
                    above.max(row[j])
                };
                diagonal = above;
            }
        }
        row[new.len()]
    }

    fn random_sequence(rng: &mut StdRng, alphabet: &[char], max_len: usize) -> Vec<char> {
        let len = rng.random_range(0..=max_len);
        (0..len)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect()
    }

    #[test]
    fn identical_inputs_are_one_equal_run() {
        let a = chars("abcdef");
        assert_eq!(
            diff(&a, &a),
            vec![DiffOp::Equal {
                old: 0,
                new: 0,
                len: 6
            }]
        );
    }

    #[test]
    fn empty_sides() {
        let a = chars("abc");
        let empty: Vec<char> = Vec::new();
        assert_eq!(diff(&empty, &empty), vec![]);
        assert_eq!(diff(&a, &empty), vec![DiffOp::Delete { old: 0, len: 3 }]);
        assert_eq!(diff(&empty, &a), vec![DiffOp::Insert { new: 0, len: 3 }]);
    }

    #[test]
    fn single_substitution() {
        let (a, b) = (chars("hello"), chars("hallo"));
        let ops = diff(&a, &b);
        assert_script_valid(&a, &b, &ops);
        assert_eq!(common_len(&ops), 4);
    }

    #[test]
    fn disjoint_inputs_share_nothing() {
        let (a, b) = (chars("abc"), chars("xyz"));
        let ops = diff(&a, &b);
        assert_script_valid(&a, &b, &ops);
        assert_eq!(
            ops,
            vec![
                DiffOp::Delete { old: 0, len: 3 },
                DiffOp::Insert { new: 0, len: 3 }
            ]
        );
    }

    #[test]
    fn one_sided_elements_are_put_back_in_place() {
        let (a, b) = (chars("xaybz"), chars("paqbr"));
        let ops = diff(&a, &b);
        assert_script_valid(&a, &b, &ops);
        assert_eq!(common_len(&ops), 2);
    }

    #[test]
    fn script_is_minimal() {
        let cases = [
            ("ABCABBA", "CBABAC"),
            ("kitten", "sitting"),
            ("the quick brown fox", "a quick brown dog jumps"),
            ("abcabcabcabc", "cbacbacba"),
            ("xxxxaxxxx", "xxxxbxxxxx"),
            ("0123456789", "9876543210"),
            ("aaaaaaaaab", "baaaaaaaaa"),
            ("lorem ipsum dolor sit amet", "ipsum lorem sit dolor amet consectetur"),
        ];
        for (old, new) in cases {
            let (a, b) = (chars(old), chars(new));
            let ops = diff(&a, &b);
            assert_script_valid(&a, &b, &ops);
            assert_eq!(
                common_len(&ops),
                lcs_len(&a, &b),
                "LCS length mismatch for {old:?} -> {new:?}"
            );
        }
    }

    #[test]
    fn random_scripts_are_minimal() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let alphabets: [&[char]; 4] = [
            &['a', 'b'],
            &['a', 'b', 'c'],
            &['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'],
            &['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p'],
        ];

        for round in 0..3000 {
            let alphabet = alphabets[round % alphabets.len()];
            let a = random_sequence(&mut rng, alphabet, 40);
            let b = random_sequence(&mut rng, alphabet, 40);
            let ops = diff(&a, &b);
            assert_script_valid(&a, &b, &ops);
            assert_eq!(common_len(&ops), lcs_len(&a, &b), "{a:?} -> {b:?}");
        }
    }

    #[test]
    fn never_keeps_less_than_similar() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..500 {
            let a: String = random_sequence(&mut rng, &['a', 'b', 'c', 'd'], 30)
                .into_iter()
                .collect();
            let b: String = random_sequence(&mut rng, &['a', 'b', 'c', 'd'], 30)
                .into_iter()
                .collect();
            let theirs: usize = TextDiff::configure()
                .algorithm(Algorithm::Myers)
                .diff_chars(&a, &b)
                .iter_all_changes()
                .filter(|change| change.tag() == ChangeTag::Equal)
                .map(|change| change.value().chars().count())
                .sum();
            assert!(common_len(&diff(&chars(&a), &chars(&b))) >= theirs);
        }
    }

    #[test]
    fn anchored_scripts_mirror_each_other() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..2000 {
            let a = random_sequence(&mut rng, &['a', 'b', 'c'], 12);
            let b = random_sequence(&mut rng, &['a', 'b', 'c'], 12);
            let forward = diff_anchored(&a, &b, a <= b);
            let backward = diff_anchored(&b, &a, b <= a);
            let flipped: Vec<DiffOp> = backward.into_iter().map(DiffOp::flipped).collect();

            let matches = |ops: &[DiffOp]| -> Vec<(usize, usize)> {
                ops.iter()
                    .flat_map(|op| match *op {
                        DiffOp::Equal { old, new, len } => {
                            (0..len).map(|i| (old + i, new + i)).collect::<Vec<_>>()
                        }
                        _ => Vec::new(),
                    })
                    .collect()
            };
            assert_script_valid(&a, &b, &forward);
            assert_eq!(matches(&forward), matches(&flipped), "{a:?} <-> {b:?}");
        }
    }

    #[test]
    fn large_inputs_stay_valid() {
        let old: Vec<u32> = (0..5000).map(|i| i % 97).collect();
        let new: Vec<u32> = (0..5200).map(|i| (i * 7) % 97).collect();
        let ops = diff(&old, &new);
        assert_script_valid(&old, &new, &ops);
    }

    #[test]
    fn rewritten_documents_skip_the_search() {
        let old: Vec<u32> = (0..20_000).collect();
        let new: Vec<u32> = (20_000..40_000).collect();

        let started = Instant::now();
        let ops = diff(&old, &new);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(
            ops,
            vec![
                DiffOp::Delete { old: 0, len: 20_000 },
                DiffOp::Insert { new: 0, len: 20_000 }
            ]
        );
    }

    #[test]
    fn swapped_halves_finish() {
        // every element is shared, but each half only matches the opposite half
        let old: Vec<u32> = (0..6_000).collect();
        let new: Vec<u32> = (3_000..6_000).chain(0..3_000).collect();

        let started = Instant::now();
        let ops = diff(&old, &new);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_script_valid(&old, &new, &ops);
        assert_eq!(common_len(&ops), 3_000);
    }
}
