//! Commands on numeric tables: `normalize` and `rank`.


use crate::utils::{read_table, OutputArgs};
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabkit_table::LabeledTable;

/// Arguments for `normalize`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct NormalizeArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `rank`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct RankArgs {
    /// Input table (tab-separated), or '-' for stdin.
    pub input: PathBuf,

    /// Divide each rank by the largest rank in its column.
    #[clap(short = 'n', long)]
    pub normalize: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

fn read_numeric(path: &Path) -> Result<LabeledTable<f64>, Report> {
    read_table(path)?
        .to_float()
        .wrap_err_with(|| eyre!("Table contains non-numeric values: {path:?}"))
        .suggestion("Metadata rows can be removed first with `tabkit head` or `tabkit delete`.")
}

/// Scale every column to sum to 1.
pub fn normalize(args: &NormalizeArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_numeric(&args.input)?;
    table.normalize_columns();
    Ok(table.unfloat())
}

/// Replace every value with its rank within its column.
pub fn rank(args: &RankArgs) -> Result<LabeledTable<String>, Report> {
    let mut table = read_numeric(&args.input)?;
    table.rank_columns(args.normalize);
    Ok(table.unfloat())
}
