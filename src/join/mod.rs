//! The `merge` command: join several tables on their row and column labels.


use crate::utils::{read_table, OutputArgs};
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabkit_table::{LabeledTable, Overlap};

/// Arguments for `merge`.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct MergeArgs {
    /// Input tables (tab-separated), merged left to right. Values in earlier tables win.
    #[clap(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Fill cells with no source value with this instead of the missing sentinel.
    #[clap(long)]
    pub fill_empty: Option<String>,

    /// Table of metadata rows to place on top of the merged table.
    #[clap(long)]
    pub metatable: Option<PathBuf>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Merge tables left to right, then optionally fill missing cells and add metadata rows.
///
/// Returns the merged table and the overlap reported by each join, in order.
pub fn merge(args: &MergeArgs) -> Result<(LabeledTable<String>, Vec<Overlap>), Report> {
    let (first, rest) = args
        .inputs
        .split_first()
        .ok_or_else(|| eyre!("No input tables to merge."))
        .suggestion("Provide at least one input table.")?;

    let mut table = read_table(first)?;
    let mut overlaps = Vec::new();

    for path in rest {
        let other = read_table(path)?;
        let overlap = table.merge(&other);
        if !overlap.conflicts.is_empty() {
            warn!("{} values in {path:?} were discarded in favor of earlier tables.", overlap.conflicts.len());
        }
        overlaps.push(overlap);
    }

    if let Some(value) = &args.fill_empty {
        table.na_to_value(value.clone());
    }

    if let Some(path) = &args.metatable {
        let meta = read_table(path)?;
        overlaps.push(table.metamerge(&meta));
    }

    info!("Merged {} tables, final size is {}", args.inputs.len(), table.size());
    Ok((table, overlaps))
}
