//! Command-line interface for diffy.

use crate::config::{OutputFormat, Settings};
use crate::engine::Granularity;
use clap::Parser;
use std::path::PathBuf;

/// diffy - compare two text files side by side
#[derive(Parser, Debug)]
#[command(name = "diffy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Old document (`-` reads standard input)
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// New document (`-` reads standard input)
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Context lines around each hunk in unified output
    #[arg(short = 'U', long, value_name = "LINES")]
    pub context: Option<usize>,

    /// Inline highlighting granularity: char or word
    #[arg(short, long)]
    pub granularity: Option<Granularity>,

    /// Characters per side in side-by-side output
    #[arg(short, long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Swap the two documents before comparing
    #[arg(long)]
    pub swap: bool,

    /// Give up if the comparison takes longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Store the effective output settings as the new defaults
    #[arg(long)]
    pub save_config: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Stored settings with this invocation's flags applied on top
    pub fn apply_to(&self, settings: &Settings) -> Settings {
        Settings {
            format: self.format.unwrap_or(settings.format),
            context_lines: self.context.unwrap_or(settings.context_lines),
            granularity: self.granularity.unwrap_or(settings.granularity),
            column_width: self.width.unwrap_or(settings.column_width),
            color: settings.color && !self.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "diffy", "old.txt", "new.txt", "-f", "unified", "-U", "1", "-g", "word", "--no-color",
        ])
        .unwrap();
        let settings = cli.apply_to(&Settings::default());

        assert_eq!(cli.left, PathBuf::from("old.txt"));
        assert_eq!(settings.format, OutputFormat::Unified);
        assert_eq!(settings.context_lines, 1);
        assert_eq!(settings.granularity, Granularity::Word);
        assert!(!settings.color);
    }

    #[test]
    fn test_settings_fill_missing_flags() {
        let cli = Cli::try_parse_from(["diffy", "a", "b"]).unwrap();
        let stored = Settings {
            format: OutputFormat::Stats,
            column_width: 33,
            ..Settings::default()
        };
        assert_eq!(cli.apply_to(&stored), stored);
    }

    #[test]
    fn test_format_names() {
        let cli = Cli::try_parse_from(["diffy", "a", "b", "--format", "side-by-side"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::SideBySide));
        assert!(Cli::try_parse_from(["diffy", "a", "b", "--format", "html"]).is_err());
    }

    #[test]
    fn test_both_paths_required() {
        assert!(Cli::try_parse_from(["diffy", "only-one"]).is_err());
    }
}
