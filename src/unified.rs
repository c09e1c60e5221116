//! Unified-diff export of a comparison.
//!
//! Reads the aligned rows back into `-`/`+`/` ` lines: deleted and modified
//! rows of the left side become `-` lines, inserted and modified rows of the
//! right side become `+` lines, imaginary rows are skipped. Within one run of
//! changed rows every `-` line comes before every `+` line.

use crate::constant::DEFAULT_CONTEXT_LINES;
use crate::engine::{ChangeKind, ComparisonResult};
use std::fmt::{self, Write};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Context(&'a str),
    Removed(&'a str),
    Added(&'a str),
}

impl Line<'_> {
    fn is_change(&self) -> bool {
        !matches!(self, Line::Context(_))
    }

    fn counts(&self) -> (usize, usize) {
        match self {
            Line::Context(_) => (1, 1),
            Line::Removed(_) => (1, 0),
            Line::Added(_) => (0, 1),
        }
    }
}

pub struct UnifiedDiff<'a> {
    result: &'a ComparisonResult,
    context: usize,
    left_label: String,
    right_label: String,
}

impl<'a> UnifiedDiff<'a> {
    pub fn new(result: &'a ComparisonResult) -> Self {
        Self {
            result,
            context: DEFAULT_CONTEXT_LINES,
            left_label: "left".to_string(),
            right_label: "right".to_string(),
        }
    }

    /// Number of unchanged lines shown around each change.
    pub fn context(mut self, lines: usize) -> Self {
        self.context = lines;
        self
    }

    pub fn labels(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_label = left.into();
        self.right_label = right.into();
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let result = self.result;
        let mut lines = Vec::with_capacity(result.len());
        let mut removed = Vec::new();
        let mut added = Vec::new();

        for (left, right) in result.rows() {
            if left.kind == ChangeKind::Unchanged {
                lines.append(&mut removed);
                lines.append(&mut added);
                lines.push(Line::Context(&left.text));
                continue;
            }

            if matches!(left.kind, ChangeKind::Deleted | ChangeKind::Modified) {
                removed.push(Line::Removed(&left.text));
            }
            if matches!(right.kind, ChangeKind::Inserted | ChangeKind::Modified) {
                added.push(Line::Added(&right.text));
            }
        }
        lines.append(&mut removed);
        lines.append(&mut added);

        lines
    }

    /// Group line indices into hunks, merging hunks whose context would touch.
    fn hunks(&self, lines: &[Line<'_>]) -> Vec<Range<usize>> {
        let mut hunks: Vec<Range<usize>> = Vec::new();

        for (index, _) in lines.iter().enumerate().filter(|(_, l)| l.is_change()) {
            let start = index.saturating_sub(self.context);
            let end = (index + 1 + self.context).min(lines.len());
            match hunks.last_mut() {
                Some(last) if start <= last.end => last.end = last.end.max(end),
                _ => hunks.push(start..end),
            }
        }

        hunks
    }

    pub fn render(&self) -> String {
        let lines = self.lines();
        let hunks = self.hunks(&lines);
        if hunks.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        let _ = writeln!(out, "--- {}", self.left_label);
        let _ = writeln!(out, "+++ {}", self.right_label);

        // lines of each side consumed before the current hunk
        let (mut old_before, mut new_before) = (0, 0);
        let mut cursor = 0;

        for hunk in hunks {
            for line in &lines[cursor..hunk.start] {
                let (o, n) = line.counts();
                old_before += o;
                new_before += n;
            }

            let (old_count, new_count) = lines[hunk.clone()]
                .iter()
                .map(Line::counts)
                .fold((0, 0), |(a, b), (o, n)| (a + o, b + n));
            let old_start = if old_count == 0 { old_before } else { old_before + 1 };
            let new_start = if new_count == 0 { new_before } else { new_before + 1 };

            let _ = writeln!(out, "@@ -{old_start},{old_count} +{new_start},{new_count} @@");
            for line in &lines[hunk.clone()] {
                let _ = match line {
                    Line::Context(text) => writeln!(out, " {text}"),
                    Line::Removed(text) => writeln!(out, "-{text}"),
                    Line::Added(text) => writeln!(out, "+{text}"),
                };
            }

            old_before += old_count;
            new_before += new_count;
            cursor = hunk.end;
        }

        out
    }
}

impl fmt::Display for UnifiedDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
