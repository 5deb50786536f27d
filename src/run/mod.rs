//! Dispatch a parsed [Command] to its operation and write the result.

#[cfg(test)]
mod tests;

use crate::cli::Command;
use crate::{filter, join, numeric, reshape};
use color_eyre::eyre::{Report, Result};
use log::info;

/// Run a command, writing its table to the requested output.
pub fn run(command: Command) -> Result<(), Report> {
    let (table, output) = match command {
        Command::Grep(args) => (filter::grep(&args)?, args.filter.output),
        Command::Select(args) => (filter::select(&args)?, args.filter.output),
        Command::Delete(args) => (filter::delete(&args)?, args.filter.output),
        Command::Head(args) => (filter::head(&args)?, args.filter.output),
        Command::Limit(args) => (filter::limit(&args)?, args.filter.output),
        Command::Nontrivial(args) => (filter::nontrivial(&args)?, args.filter.output),
        Command::Transpose(args) => (reshape::transpose(&args)?, args.output),
        Command::Sort(args) => (reshape::sort(&args)?, args.output),
        Command::Group(args) => (reshape::group(&args)?, args.output),
        Command::Stratify(args) => {
            let paths = reshape::stratify(&args)?;
            info!("Wrote {} strata to {:?}", paths.len(), args.output_dir);
            return Ok(());
        }
        Command::Merge(args) => (join::merge(&args)?.0, args.output),
        Command::Normalize(args) => (numeric::normalize(&args)?, args.output),
        Command::Rank(args) => (numeric::rank(&args)?, args.output),
    };

    output.write(&table)
}
