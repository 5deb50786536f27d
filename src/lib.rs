//! `tabkit` filters, reshapes, and joins **tab**ular data with labeled rows and columns.
//!
//! Tables are tab-separated text. The first row holds the column labels, the first column holds
//! the row labels, and the top-left cell (the origin) labels the row labels themselves:
//!
//! ```text
//! #      S1    S2
//! host   cat   dog
//! A      1     0
//! B      3     #N/A
//! ```
//!
//! Every command reads one table (or several, for `merge`), transforms it with the
//! [`tabkit_table::LabeledTable`] container, and writes the result as TSV, markdown, or JSON.
//! Commands that filter rows take `--transposed` to act on columns instead.
//!
//! ```rust
//! use clap::Parser;
//! use tabkit::{cli::Command, Cli};
//! let args = Cli::parse_from(["tabkit", "limit", "table.tsv", "S1", ">=1"]);
//! assert!(matches!(args.command, Command::Limit(_)));
//! ```

pub mod cli;
pub mod filter;
pub mod join;
pub mod numeric;
pub mod reshape;
pub mod run;
pub mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use utils::verbosity::Verbosity;
