//! Commands that keep or drop rows: `grep`, `select`, `delete`, `head`, `limit`, and `nontrivial`.

#[cfg(test)]
mod tests;

use crate::utils::{key, read_lines, read_table, OutputArgs};
use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use color_eyre::Help;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabkit_table::{Error, Key, LabeledTable, Options};

// ----------------------------------------------------------------------------
// Shared Arguments

/// Arguments shared by the filter commands.
#[derive(Clone, Debug, Default, Deserialize, clap::Args, Serialize)]
pub struct FilterArgs {
    /// Filter columns instead of rows.
    #[clap(short = 't', long)]
    pub transposed: bool,

    /// Keep the rows that do NOT match.
    #[clap(short = 'i', long)]
    pub invert: bool,

    /// Set aside the rows up to and including this one while filtering, then restore them on top.
    #[clap(short = 'm', long)]
    pub protect: Option<String>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl FilterArgs {
    pub fn options(&self) -> Options {
        Options::new().transposed(self.transposed).invert(self.invert)
    }

    /// Apply a filter to the table, holding back the protected rows if requested.
    fn apply<F>(&self, table: &mut LabeledTable<String>, filter: F) -> Result<(), Error>
    where
        F: FnOnce(&mut LabeledTable<String>, Options) -> Result<Option<LabeledTable<String>>, Error>,
    {
        let Some(last) = &self.protect else {
            filter(table, self.options())?;
            return Ok(());
        };
        let (meta, mut rest) = table.metasplit(key(last))?;
        filter(&mut rest, self.options())?;
        rest.metamerge(&meta);
        *table = rest;
        Ok(())
    }
}

/// Arguments for the commands that match a focal value against a list (`grep`, `select`, `delete`).
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct MatchArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Regular expressions (grep) or exact values (select, delete) to match.
    #[clap(required_unless_present = "values_file")]
    pub values: Vec<String>,

    /// Read more values from a file, one per line.
    #[clap(short = 'x', long)]
    pub values_file: Option<PathBuf>,

    /// Match values in this column (or '#N' for position N) instead of the row labels.
    #[clap(short = 'f', long)]
    pub focus: Option<String>,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

impl MatchArgs {
    fn focus(&self) -> Option<Key> {
        self.focus.as_deref().map(key)
    }

    fn values(&self) -> Result<Vec<String>, Report> {
        let mut values = self.values.clone();
        if let Some(path) = &self.values_file {
            values.extend(read_lines(path)?);
        }
        Ok(values)
    }
}

// ----------------------------------------------------------------------------
// Commands

/// Keep rows where any regular expression matches the row label (or focus column).
pub fn grep(args: &MatchArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    let values = args.values()?;
    args.filter
        .apply(&mut table, |t, options| t.grep(&values, args.focus(), options))
        .map_err(|e| explain(e, args))?;
    Ok(table)
}

/// Keep rows where the row label (or focus column) is one of the values.
pub fn select(args: &MatchArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    let values = args.values()?;
    args.filter
        .apply(&mut table, |t, options| t.select(&values, args.focus(), options))
        .map_err(|e| explain(e, args))?;
    Ok(table)
}

/// Drop rows where the row label (or focus column) is one of the values.
pub fn delete(args: &MatchArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    let values = args.values()?;
    args.filter
        .apply(&mut table, |t, options| t.delete(&values, args.focus(), options))
        .map_err(|e| explain(e, args))?;
    Ok(table)
}

fn explain(error: Error, args: &MatchArgs) -> Report {
    let input = &args.input;
    match error {
        e @ Error::BadIndex { .. } => Report::new(e)
            .wrap_err(format!("Unknown focus column or protected row in {input:?}"))
            .suggestion("Use --transposed if the focus is a row label."),
        e @ Error::Parse { .. } => Report::new(e)
            .wrap_err("Invalid regular expression.")
            .suggestion("Quote patterns that contain shell characters, ex. 'A|B'."),
        e => Report::new(e).wrap_err(format!("Failed to filter {input:?}")),
    }
}

/// Arguments for `head`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct HeadArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Keep rows up to and including this row label, or '#N' for position N.
    pub label: String,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

/// Keep rows from the first row up to and including the labeled row.
pub fn head(args: &HeadArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    args.filter
        .apply(&mut table, |t, options| t.head(key(&args.label), options))
        .wrap_err_with(|| format!("Failed to apply head on {:?}", args.label))?;
    Ok(table)
}

/// Arguments for `limit`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct LimitArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Column holding the numeric values, or '#N' for position N.
    pub column: String,

    /// Comparison and threshold, ex. '>=10'.
    #[clap(allow_hyphen_values = true)]
    pub criterion: String,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

/// Keep rows whose value in a column satisfies a numeric criterion.
pub fn limit(args: &LimitArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    args.filter
        .apply(&mut table, |t, options| t.limit(key(&args.column), &args.criterion, options))
        .wrap_err_with(|| format!("Failed to limit {:?} to {:?}", args.column, args.criterion))
        .suggestion("Criteria are an operator (<, <=, >, >=, ==, !=) and a number, ex. '>=10'.")?;
    Ok(table)
}

/// Arguments for `nontrivial`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct NontrivialArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Number of values a row needs at or above --min-value.
    #[clap(long, default_value_t = 1)]
    pub min_count: usize,

    /// Smallest value that counts toward --min-count.
    #[clap(long, default_value_t = 1e-20, allow_hyphen_values = true)]
    pub min_value: f64,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

/// Keep rows with at least `min_count` values of at least `min_value`.
pub fn nontrivial(args: &NontrivialArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    args.filter
        .apply(&mut table, |t, options| t.nontrivial(args.min_count, args.min_value, options))
        .wrap_err_with(|| format!("Failed to keep rows with {} values >= {}", args.min_count, args.min_value))
        .suggestion("Every value outside the protected rows must be numeric or missing.")?;
    Ok(table)
}
