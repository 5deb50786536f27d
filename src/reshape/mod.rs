//! Commands that reshape a table: `transpose`, `sort`, `group`, and `stratify`.


use crate::utils::{key, read_table, OutputArgs};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use strum::{Display, EnumIter};
use tabkit_table::filter::parse_number;
use tabkit_table::numeric::{format_general, SIG_FIGS};
use tabkit_table::{Error, LabeledTable, Options, DUP_SUFFIX};

// ----------------------------------------------------------------------------
// Transpose

/// Arguments for `transpose`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct TransposeArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Swap rows and columns.
pub fn transpose(args: &TransposeArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    table.transpose();
    Ok(table)
}

// ----------------------------------------------------------------------------
// Sort

/// Arguments for `sort`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct SortArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Explicit label order (comma-separated). Labels not listed are dropped.
    #[clap(long, value_delimiter = ',')]
    pub order: Option<Vec<String>>,

    /// Sort columns instead of rows.
    #[clap(long)]
    pub cols: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Sort rows (or columns) by label, or into an explicit order.
pub fn sort(args: &SortArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_table(&args.input)?;
    let result = match (&args.order, args.cols) {
        (None, false) => {
            table.sort_rows();
            Ok(())
        }
        (None, true) => {
            table.sort_cols();
            Ok(())
        }
        (Some(order), false) => table.reorder_rows(order),
        (Some(order), true) => table.reorder_cols(order),
    };
    result.wrap_err("Failed to reorder table.").suggestion("Every label in --order must exist in the table.")?;
    Ok(table)
}

// ----------------------------------------------------------------------------
// Group

/// How the values of a column are combined within a group.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, PartialEq, Serialize, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Aggregate {
    /// Sum of the numeric values.
    #[default]
    Sum,
    /// Mean of the numeric values.
    Mean,
    /// Smallest numeric value.
    Min,
    /// Largest numeric value.
    Max,
    /// Number of values that are not missing.
    Count,
    /// The first value.
    First,
    /// All values, comma-separated.
    Join,
}

impl Aggregate {
    /// Combine the values of one column for all rows in a group.
    ///
    /// Missing values are skipped by the numeric aggregates, and a group with no numeric values
    /// is missing.
    ///
    /// ```
    /// use tabkit::reshape::Aggregate;
    ///
    /// let values = ["1", "#N/A", "2.5"].map(String::from);
    /// assert_eq!(Aggregate::Sum.apply(&values, "#N/A")?, "3.5");
    /// assert_eq!(Aggregate::Count.apply(&values, "#N/A")?, "2");
    /// assert_eq!(Aggregate::Join.apply(&values, "#N/A")?, "1,#N/A,2.5");
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn apply(&self, values: &[String], missing: &str) -> Result<String, Error> {
        let present = values.iter().filter(|v| v.as_str() != missing).collect_vec();
        let value = match self {
            Aggregate::Count => present.len().to_string(),
            Aggregate::First => values.first().cloned().unwrap_or_else(|| missing.to_string()),
            Aggregate::Join => values.join(","),
            Aggregate::Sum | Aggregate::Mean | Aggregate::Min | Aggregate::Max => {
                let numbers = present.iter().map(|v| parse_number(v)).collect::<Result<Vec<f64>, Error>>()?;
                if numbers.is_empty() {
                    return Ok(missing.to_string());
                }
                let result: f64 = match self {
                    Aggregate::Sum => numbers.iter().sum(),
                    Aggregate::Mean => numbers.iter().sum::<f64>() / numbers.len() as f64,
                    Aggregate::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
                    _ => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                };
                format_general(result, SIG_FIGS)
            }
        };
        Ok(value)
    }
}

/// Arguments for `group`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct GroupArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Regular expression applied to each row label to find its group.
    ///
    /// The group is the first capture group if there is one, otherwise the whole match.
    /// Labels that don't match are their own group.
    #[clap(short = 'p', long)]
    pub pattern: String,

    /// How to combine the values in each group.
    #[clap(short = 'a', long, value_enum, default_value_t = Aggregate::default())]
    pub aggregate: Aggregate,

    /// Group columns instead of rows.
    #[clap(short = 't', long)]
    pub transposed: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Return the group of a label, according to a pattern.
pub fn group_key(pattern: &Regex, label: &str) -> String {
    match pattern.captures(label) {
        Some(captures) => captures.get(1).or_else(|| captures.get(0)).map(|m| m.as_str()).unwrap_or(label).to_string(),
        None => label.to_string(),
    }
}

/// Collapse rows (or columns) that share a group, combining their values.
pub fn group(args: &GroupArgs) -> Result<LabeledTable<String>, Report> {
    let pattern = Regex::new(&args.pattern)
        .wrap_err_with(|| eyre!("Invalid group pattern: {:?}", args.pattern))
        .suggestion("Use a capture group to extract the group name, ex. '^([^.]+)'.")?;

    let mut table = read_table(&args.input)?;
    let missing = table.missing().clone();
    let options = Options::new().transposed(args.transposed);
    info!("Grouping by {:?} with aggregate {}", args.pattern, args.aggregate);

    table
        .group_by(|label| group_key(&pattern, label), |values| args.aggregate.apply(values, &missing), options)
        .wrap_err_with(|| eyre!("Failed to aggregate groups with {}", args.aggregate))
        .suggestion("Numeric aggregates need numeric values, try --aggregate first or join.")?;
    Ok(table)
}

// ----------------------------------------------------------------------------
// Stratify

/// Arguments for `stratify`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct StratifyArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Column whose values define the strata, or '#N' for position N.
    pub column: String,

    /// Directory where one table per stratum is written, as <value>.tsv
    ///
    /// Path separators in values become '_', and names that collide get a '-dup' suffix.
    #[clap(short = 'd', long)]
    pub output_dir: PathBuf,

    /// Split columns by the values in a row instead.
    #[clap(short = 't', long)]
    pub transposed: bool,
}

/// Split a table into one table per distinct value of a column, written to the output directory.
///
/// Returns the paths of the written tables.
pub fn stratify(args: &StratifyArgs) -> Result<Vec<PathBuf>, Report> {
    let table = read_table(&args.input)?;
    let strata = table
        .stratify(key(&args.column), Options::new().transposed(args.transposed))
        .wrap_err_with(|| eyre!("Failed to stratify by {:?}", args.column))?;

    std::fs::create_dir_all(&args.output_dir)
        .wrap_err_with(|| eyre!("Unable to create output directory: {:?}", args.output_dir))?;

    let mut paths = Vec::new();
    let mut seen = HashSet::new();
    for (value, stratum) in strata {
        let mut file_name = value.replace(['/', '\\'], "_");
        while seen.contains(&file_name) {
            file_name.push_str(DUP_SUFFIX);
        }
        if file_name != value {
            warn!("Stratum {value:?} is written as {file_name:?}");
        }
        seen.insert(file_name.clone());
        let path = args.output_dir.join(format!("{file_name}.tsv"));
        stratum.write(Some(path.as_path())).wrap_err_with(|| eyre!("Unable to write stratum {value:?}"))?;
        info!("Wrote stratum {value:?} with size {} to {path:?}", stratum.size());
        paths.push(path);
    }
    Ok(paths)
}
