use crate::cli::Cli;
use crate::config::{Config, ConfigError, OutputFormat, Settings};
use crate::engine::{CompareOptions, ComparisonResult, compare_with};
use crate::render::SideBySide;
use crate::unified::UnifiedDiff;
use crate::worker::{WorkerError, spawn_comparer};
use chrono::{DateTime, Local};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const STDIN_PATH: &str = "-";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("invalid timeout: {0}")]
    InvalidTimeout(f64),
}

/// A document loaded for comparison
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub modified: Option<DateTime<Local>>,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let read_error = |source| AppError::Read {
            path: path.to_path_buf(),
            source,
        };

        let (bytes, modified) = if path == Path::new(STDIN_PATH) {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes).map_err(read_error)?;
            (bytes, None)
        } else {
            let bytes = fs::read(path).map_err(read_error)?;
            let modified = fs::metadata(path)
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Local>::from);
            (bytes, modified)
        };

        Ok(Self {
            path: path.to_path_buf(),
            text: decode(path, bytes),
            modified,
        })
    }

    /// Header label for unified output: the path, then the modification time if known
    pub fn label(&self) -> String {
        match self.modified {
            Some(time) => format!(
                "{}\t{}",
                self.path.display(),
                time.format("%Y-%m-%d %H:%M:%S%.9f %z")
            ),
            None => self.path.display().to_string(),
        }
    }
}

fn decode(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{:?} is not valid UTF-8, replacing invalid sequences", path);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Run one comparison from the command line. Returns whether the documents differ.
pub fn run(cli: Cli) -> Result<bool, AppError> {
    let config = Config::load_or_default();
    let settings = cli.apply_to(&config.settings);

    if cli.save_config {
        let path = Config {
            settings: settings.clone(),
        }
        .save()?;
        info!("Stored settings in {:?}", path);
    }

    let mut left = Document::load(&cli.left)?;
    let mut right = Document::load(&cli.right)?;
    if cli.swap {
        std::mem::swap(&mut left, &mut right);
    }

    let options = CompareOptions {
        granularity: settings.granularity,
    };
    let result = match cli.timeout {
        Some(seconds) => compare_in_background(&left, &right, options, seconds)?,
        None => compare_with(&left.text, &right.text, &options),
    };
    debug!("{}", result.summary());

    let stdout = io::stdout();
    let color = settings.color && stdout.is_terminal();
    let output = format_result(&result, &left, &right, &settings, color)?;

    let mut handle = stdout.lock();
    handle.write_all(output.as_bytes())?;
    handle.flush()?;

    Ok(result.has_changes())
}

fn compare_in_background(
    left: &Document,
    right: &Document,
    options: CompareOptions,
    seconds: f64,
) -> Result<ComparisonResult, AppError> {
    let timeout =
        Duration::try_from_secs_f64(seconds).map_err(|_| AppError::InvalidTimeout(seconds))?;

    let mut comparer = spawn_comparer();
    let ticket = comparer.submit(left.text.as_str(), right.text.as_str(), options)?;
    Ok(comparer.wait_timeout(ticket, timeout)?)
}

pub fn format_result(
    result: &ComparisonResult,
    left: &Document,
    right: &Document,
    settings: &Settings,
    color: bool,
) -> Result<String, AppError> {
    let output = match settings.format {
        OutputFormat::SideBySide => SideBySide::new(result)
            .column_width(settings.column_width)
            .color(color)
            .render(),
        OutputFormat::Unified => UnifiedDiff::new(result)
            .context(settings.context_lines)
            .labels(left.label(), right.label())
            .render(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        OutputFormat::Stats => {
            let chars = result.char_stats();
            format!(
                "Compared: {}\nCharacters: {} inserted, {} deleted\n",
                result.summary(),
                chars.inserted_chars,
                chars.deleted_chars
            )
        }
    };

    Ok(output)
}
