//! Reading and writing tables for the command-line interface.

pub mod verbosity;

use clap::ValueEnum;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::Display;
use tabkit_table::{Error, Key, LabeledTable};

/// The path that stands for stdin.
pub const STDIN: &str = "-";

// ----------------------------------------------------------------------------
// Output Format

/// The text format of the output table.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, PartialEq, Serialize, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated values.
    #[default]
    Tsv,
    /// A markdown table.
    Markdown,
    /// Labels and values as JSON.
    Json,
}

// ----------------------------------------------------------------------------
// Output Arguments

/// Output arguments shared by every command that produces a table.
#[derive(Clone, Debug, Default, Deserialize, clap::Args, Serialize)]
pub struct OutputArgs {
    /// Output file path. If not provided, the table is written to stdout.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,
}

impl OutputArgs {
    /// Write the table to the output path (or stdout) in the output format.
    pub fn write(&self, table: &LabeledTable<String>) -> Result<(), Report> {
        let text = render(table, self.format)?;
        match &self.output {
            Some(path) => {
                let mut file = File::create(path)
                    .wrap_err_with(|| eyre!("Unable to create file: {path:?}"))
                    .suggestion("Does the parent directory exist?")?;
                file.write_all(text.as_bytes()).wrap_err_with(|| eyre!("Unable to write table: {path:?}"))?;
                debug!("Wrote {} table to {path:?}.", self.format);
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes()).wrap_err("Unable to write table to stdout.")?;
            }
        }
        Ok(())
    }
}

/// Render the table as text in the given format.
pub fn render(table: &LabeledTable<String>, format: OutputFormat) -> Result<String, Report> {
    let text = match format {
        OutputFormat::Tsv => table.to_string(),
        OutputFormat::Markdown => table.to_markdown(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(table).wrap_err("Unable to serialize table to JSON.")?;
            json.push('\n');
            json
        }
    };
    Ok(text)
}

// ----------------------------------------------------------------------------
// Input

/// Read a tab-delimited table from a file, or from stdin if the path is `-`.
pub fn read_table(path: &Path) -> Result<LabeledTable<String>, Report> {
    let result = if path == Path::new(STDIN) {
        LabeledTable::from_reader(std::io::stdin().lock(), "<stdin>")
    } else {
        LabeledTable::from_file(path)
    };

    match result {
        Ok(table) => Ok(table),
        Err(e @ Error::Format { .. }) => Err(e)
            .wrap_err_with(|| eyre!("Failed to parse table: {path:?}"))
            .suggestion("Every row needs one label plus one tab-separated value per column in the header."),
        Err(e) => Err(e).wrap_err_with(|| eyre!("Failed to read table: {path:?}")),
    }
}

/// Parse a row or column key from the command line.
///
/// `#N` addresses the 0-based position `N`, anything else is a label.
///
/// ```
/// use tabkit::utils::key;
/// use tabkit_table::Key;
/// assert_eq!(key("#2"), Key::Position(2));
/// assert_eq!(key("#"), Key::Label("#"));
/// assert_eq!(key("host"), Key::Label("host"));
/// ```
pub fn key(text: &str) -> Key<'_> {
    match text.strip_prefix('#').and_then(|n| n.parse().ok()) {
        Some(position) => Key::Position(position),
        None => Key::Label(text),
    }
}

/// Read the non-blank lines of a file, trimmed.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Report> {
    let text = std::fs::read_to_string(path).wrap_err_with(|| eyre!("Failed to read file: {path:?}"))?;
    let lines = text.lines().map(str::trim).filter(|line| !line.is_empty()).map(String::from).collect();
    Ok(lines)
}

/// Write text to a temporary file, for tests that read tables from disk.
#[cfg(test)]
pub(crate) fn temp_table(text: &str) -> Result<tempfile::NamedTempFile, Report> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(text.as_bytes())?;
    Ok(file)
}
