//! Plain-terminal side-by-side presentation of a comparison.

use crate::constant::{DEFAULT_COLUMN_WIDTH, GUTTER_WIDTH, TAB_WIDTH};
use crate::engine::{ChangeKind, ComparisonResult, Row};
use colored::Colorize;
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct SideBySide<'a> {
    result: &'a ComparisonResult,
    column_width: usize,
    color: bool,
}

impl<'a> SideBySide<'a> {
    pub fn new(result: &'a ComparisonResult) -> Self {
        Self {
            result,
            column_width: DEFAULT_COLUMN_WIDTH,
            color: false,
        }
    }

    /// Terminal columns per side; longer lines are cut, never wrapped.
    pub fn column_width(mut self, width: usize) -> Self {
        self.column_width = width.max(1);
        self
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        for (left, right) in self.result.rows() {
            let _ = writeln!(
                out,
                "{} {} {} │ {} {} {}",
                gutter(left),
                marker(left.kind),
                self.cell(left),
                gutter(right),
                marker(right.kind),
                self.cell(right).trim_end()
            );
        }

        out
    }

    fn cell(&self, row: &Row) -> String {
        let pieces: Vec<(String, ChangeKind)> = if row.has_segments() {
            row.segments
                .iter()
                .map(|s| (expand_tabs(&s.text), s.kind))
                .collect()
        } else {
            vec![(expand_tabs(&row.text), row.kind)]
        };

        let total: usize = pieces.iter().map(|(text, _)| text.width()).sum();
        let truncated = total > self.column_width;
        let budget = if truncated {
            self.column_width - 1
        } else {
            self.column_width
        };

        let mut out = String::new();
        let mut used = 0;
        'pieces: for (text, kind) in &pieces {
            let mut visible = String::new();
            for c in text.chars() {
                let width = c.width().unwrap_or(0);
                if used + width > budget {
                    out.push_str(&self.paint(&visible, *kind, row));
                    break 'pieces;
                }
                visible.push(c);
                used += width;
            }
            out.push_str(&self.paint(&visible, *kind, row));
        }

        if truncated {
            out.push('…');
            used += 1;
        }
        out.push_str(&" ".repeat(self.column_width.saturating_sub(used)));
        out
    }

    fn paint(&self, text: &str, kind: ChangeKind, row: &Row) -> String {
        if !self.color || text.is_empty() {
            return text.to_string();
        }

        if row.has_segments() {
            match kind {
                ChangeKind::Inserted => text.black().on_green().to_string(),
                ChangeKind::Deleted => text.black().on_red().to_string(),
                _ => text.yellow().to_string(),
            }
        } else {
            match kind {
                ChangeKind::Inserted => text.green().to_string(),
                ChangeKind::Deleted => text.red().to_string(),
                ChangeKind::Modified => text.yellow().to_string(),
                _ => text.to_string(),
            }
        }
    }
}

fn gutter(row: &Row) -> String {
    match row.line_number {
        Some(number) => format!("{:>width$}", number, width = GUTTER_WIDTH),
        None => " ".repeat(GUTTER_WIDTH),
    }
}

fn marker(kind: ChangeKind) -> char {
    match kind {
        ChangeKind::Deleted => '-',
        ChangeKind::Inserted => '+',
        ChangeKind::Modified => '~',
        ChangeKind::Unchanged | ChangeKind::Imaginary => ' ',
    }
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}
