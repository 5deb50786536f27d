//! [Command-line interface](Cli) (CLI) of the main binary.


use crate::filter::{HeadArgs, LimitArgs, MatchArgs, NontrivialArgs};
use crate::join::MergeArgs;
use crate::numeric::{NormalizeArgs, RankArgs};
use crate::reshape::{GroupArgs, SortArgs, StratifyArgs, TransposeArgs};
use crate::Verbosity;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = tabkit::Cli::parse();
/// ```
/// The command-line arguments from `std::env::args` are simply a vector of space separated strings. Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// let input = ["tabkit", "grep", "table.tsv", "^A", "--focus", "host", "--transposed"];
/// let args = tabkit::Cli::parse_from(input);
/// let json = serde_json::to_string_pretty(&args)?;
/// assert!(json.contains("\"transposed\": true"));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "tabkit", author, version)]
#[clap(about = "tabkit filters, reshapes, and joins tables with labeled rows and columns.")]
#[clap(after_help = "Tables are tab-separated text: the first row holds the column labels and the first column holds the row labels. Use '-' as the input path to read from stdin.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which operation the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    #[clap(about = "Keep rows where a regular expression matches the label (or --focus column).")]
    Grep(MatchArgs),

    #[clap(about = "Keep rows where the label (or --focus column) is one of the values.")]
    Select(MatchArgs),

    #[clap(about = "Drop rows where the label (or --focus column) is one of the values.")]
    Delete(MatchArgs),

    #[clap(about = "Keep rows up to and including a labeled row.")]
    Head(HeadArgs),

    #[clap(about = "Keep rows where a numeric column satisfies a criterion, ex. '>=10'.")]
    Limit(LimitArgs),

    #[clap(about = "Keep rows with enough values above a threshold, ex. to drop rare features.")]
    Nontrivial(NontrivialArgs),

    #[clap(about = "Swap rows and columns.")]
    Transpose(TransposeArgs),

    #[clap(about = "Sort rows or columns by label, or into an explicit order.")]
    Sort(SortArgs),

    /// Rows are grouped by a regular expression applied to their labels.
    /// <br>
    /// ```rust
    /// use clap::Parser;
    /// use tabkit::{cli::Command, reshape::Aggregate, Cli};
    /// let input = ["tabkit", "group", "-", "--pattern", "^([^.]+)", "--aggregate", "mean"];
    /// let args = Cli::parse_from(input);
    /// match args.command {
    ///     Command::Group(args) => assert_eq!(args.aggregate, Aggregate::Mean),
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[clap(about = "Collapse rows that share a group, combining their values.")]
    Group(GroupArgs),

    #[clap(about = "Split a table into one table per value of a column.")]
    Stratify(StratifyArgs),

    #[clap(about = "Join tables on their labels. Values in earlier tables win.")]
    Merge(MergeArgs),

    #[clap(about = "Scale every column to sum to 1.")]
    Normalize(NormalizeArgs),

    #[clap(about = "Replace every value with its rank within its column.")]
    Rank(RankArgs),
}
