use super::myers::{self, DiffOp};
use super::types::{ChangeKind, Segment};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token size used when diffing the inside of a modified line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One token per Unicode scalar value.
    #[default]
    Char,
    /// Runs of word characters, runs of whitespace, and single punctuation marks.
    Word,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "char" | "chars" | "character" => Ok(Granularity::Char),
            "word" | "words" => Ok(Granularity::Word),
            other => Err(format!("unknown granularity '{}', expected 'char' or 'word'", other)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Char => f.write_str("char"),
            Granularity::Word => f.write_str("word"),
        }
    }
}

/// Diff the text of two paired lines.
///
/// The old side is made of `Unchanged` and `Deleted` segments, the new side of
/// `Unchanged` and `Inserted` ones. Neighbouring segments never share a kind,
/// and each side's segments concatenate back to its line.
pub fn diff_segments(old: &str, new: &str, granularity: Granularity) -> (Vec<Segment>, Vec<Segment>) {
    let old_tokens = tokenize(old, granularity);
    let new_tokens = tokenize(new, granularity);

    let mut left = Vec::new();
    let mut right = Vec::new();

    for op in myers::diff_anchored(&old_tokens, &new_tokens, old_tokens <= new_tokens) {
        match op {
            DiffOp::Equal { old, new, len } => {
                append(&mut left, &old_tokens[old..old + len], ChangeKind::Unchanged);
                append(&mut right, &new_tokens[new..new + len], ChangeKind::Unchanged);
            }
            DiffOp::Delete { old, len } => {
                append(&mut left, &old_tokens[old..old + len], ChangeKind::Deleted);
            }
            DiffOp::Insert { new, len } => {
                append(&mut right, &new_tokens[new..new + len], ChangeKind::Inserted);
            }
        }
    }

    (left, right)
}

fn append(segments: &mut Vec<Segment>, tokens: &[&str], kind: ChangeKind) {
    if tokens.is_empty() {
        return;
    }

    match segments.last_mut() {
        Some(last) if last.kind == kind => tokens.iter().for_each(|t| last.text.push_str(t)),
        _ => segments.push(Segment::new(tokens.concat(), kind)),
    }
}

fn tokenize(text: &str, granularity: Granularity) -> Vec<&str> {
    match granularity {
        Granularity::Char => text
            .char_indices()
            .map(|(start, c)| &text[start..start + c.len_utf8()])
            .collect(),
        Granularity::Word => split_words(text),
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum CharClass {
    Word,
    Space,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}

fn split_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<CharClass> = None;

    for (index, c) in text.char_indices() {
        let class = classify(c);
        // punctuation never groups
        let continues = current == Some(class) && class != CharClass::Other;
        if !continues && index > start {
            tokens.push(&text[start..index]);
            start = index;
        }
        current = Some(class);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}
