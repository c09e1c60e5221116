use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Inserted,
    Deleted,
    Modified,
    /// Placeholder keeping both sides the same length. Never carries text.
    Imaginary,
}

impl ChangeKind {
    /// The kind seen from the other side of the comparison.
    pub fn mirrored(self) -> Self {
        match self {
            ChangeKind::Inserted => ChangeKind::Deleted,
            ChangeKind::Deleted => ChangeKind::Inserted,
            other => other,
        }
    }
}

/// A span of a modified line with its own change kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub kind: ChangeKind,
}

impl Segment {
    pub fn new(text: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// 1-based line number in the row's own document, absent for imaginary rows
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_number: Option<usize>,
    pub text: String,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub segments: Vec<Segment>,
}

impl Row {
    pub fn real(line_number: usize, text: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            line_number: Some(line_number),
            text: text.into(),
            kind,
            segments: Vec::new(),
        }
    }

    pub fn imaginary() -> Self {
        Self {
            line_number: None,
            text: String::new(),
            kind: ChangeKind::Imaginary,
            segments: Vec::new(),
        }
    }

    pub fn modified(line_number: usize, text: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            line_number: Some(line_number),
            text: text.into(),
            kind: ChangeKind::Modified,
            segments,
        }
    }

    pub fn is_imaginary(&self) -> bool {
        self.kind == ChangeKind::Imaginary
    }

    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    fn mirrored(&self) -> Self {
        Self {
            line_number: self.line_number,
            text: self.text.clone(),
            kind: self.kind.mirrored(),
            segments: self
                .segments
                .iter()
                .map(|s| Segment::new(s.text.clone(), s.kind.mirrored()))
                .collect(),
        }
    }
}

/// Character-level totals over a whole comparison
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CharStats {
    pub inserted_chars: usize,
    pub deleted_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub left_rows: Vec<Row>,
    pub right_rows: Vec<Row>,
    pub inserted_count: usize,
    pub deleted_count: usize,
    pub modified_count: usize,
    pub unchanged_count: usize,
}

impl ComparisonResult {
    /// Number of aligned rows (identical on both sides).
    pub fn len(&self) -> usize {
        self.left_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_rows.is_empty()
    }

    /// Index-aligned `(left, right)` row pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&Row, &Row)> {
        self.left_rows.iter().zip(self.right_rows.iter())
    }

    pub fn has_changes(&self) -> bool {
        self.inserted_count + self.deleted_count + self.modified_count > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} inserted, {} deleted, {} modified, {} unchanged",
            self.inserted_count, self.deleted_count, self.modified_count, self.unchanged_count
        )
    }

    /// The same comparison with the two documents swapped.
    pub fn mirrored(&self) -> Self {
        Self {
            left_rows: self.right_rows.iter().map(Row::mirrored).collect(),
            right_rows: self.left_rows.iter().map(Row::mirrored).collect(),
            inserted_count: self.deleted_count,
            deleted_count: self.inserted_count,
            modified_count: self.modified_count,
            unchanged_count: self.unchanged_count,
        }
    }

    pub fn char_stats(&self) -> CharStats {
        let mut stats = CharStats::default();

        for row in self.left_rows.iter().chain(self.right_rows.iter()) {
            match row.kind {
                ChangeKind::Inserted => stats.inserted_chars += row.text.chars().count(),
                ChangeKind::Deleted => stats.deleted_chars += row.text.chars().count(),
                ChangeKind::Modified => {
                    for segment in &row.segments {
                        match segment.kind {
                            ChangeKind::Inserted => {
                                stats.inserted_chars += segment.text.chars().count()
                            }
                            ChangeKind::Deleted => {
                                stats.deleted_chars += segment.text.chars().count()
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        stats
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Unchanged => "unchanged",
            ChangeKind::Inserted => "inserted",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Modified => "modified",
            ChangeKind::Imaginary => "imaginary",
        };
        f.write_str(name)
    }
}
