//! Create and manipulate a [`LabeledTable`]: a rectangular grid of cells with named rows and named
//! columns.
//!
//! A table is usually loaded from tab-delimited text, where the first row holds the column labels
//! and the first column holds the row labels:
//!
//! ```text
//! #   S1  S2  S3
//! A   0   1   0
//! B   1   0   1
//! ```
//!
//! Rows and columns can be addressed by label or by position, filtered, sorted, transposed,
//! grouped, split into strata, and joined with other tables.
//!
//! ## Examples
//!
//! ```
//! use tabkit_table::{LabeledTable, Options};
//!
//! let mut table = LabeledTable::from_rows([
//!     ["#", "S1", "S2"],
//!     ["A", "0", "1"],
//!     ["B", "1", "0"],
//!     ["C", "1", "1"],
//! ])?;
//!
//! table.grep(&["A|C"], None, Options::default())?;
//! table.transpose();
//!
//! assert_eq!(table.row_labels(), ["S1", "S2"]);
//! assert_eq!(table.get("S2", "C")?, "1");
//! # Ok::<(), tabkit_table::Error>(())
//! ```

use std::fmt::{Debug, Display, Formatter};

pub mod combine;
mod error;
pub mod filter;
pub mod group;
mod io;
pub mod numeric;
mod table;

#[doc(inline)]
pub use combine::{Conflict, Overlap};
#[doc(inline)]
pub use error::{Axis, Error, Result};
#[doc(inline)]
pub use filter::{Comparator, Criterion, Options, RowView};
#[doc(inline)]
pub use table::LabeledTable;

/// Default value of the corner cell, above the row labels and left of the column labels.
pub const ORIGIN: &str = "#";
/// Default fill value for text cells that have no source value after a join.
pub const MISSING: &str = "#N/A";
/// Suffix appended to a label that collides with an earlier label on the same axis.
pub const DUP_SUFFIX: &str = "-dup";

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// A value that can be stored in a [`LabeledTable`].
pub trait Cell: Clone + Debug + Display + PartialEq {
    /// Returns the default missing sentinel for this cell type.
    fn missing() -> Self;

    /// Returns true if `self` is the `missing` sentinel.
    fn is_missing(&self, missing: &Self) -> bool {
        self == missing
    }
}

impl Cell for String {
    fn missing() -> Self {
        String::from(MISSING)
    }
}

impl Cell for f64 {
    fn missing() -> Self {
        f64::NAN
    }

    fn is_missing(&self, missing: &Self) -> bool {
        (self.is_nan() && missing.is_nan()) || self == missing
    }
}

// ----------------------------------------------------------------------------
// Key
// ----------------------------------------------------------------------------

/// Addresses a row or column by label or by 0-based position.
///
/// ```
/// use tabkit_table::Key;
/// assert_eq!(Key::from("A"), Key::Label("A"));
/// assert_eq!(Key::from(2usize), Key::Position(2));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key<'k> {
    Label(&'k str),
    Position(usize),
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(label: &'k str) -> Self {
        Key::Label(label)
    }
}

impl<'k> From<&'k String> for Key<'k> {
    fn from(label: &'k String) -> Self {
        Key::Label(label.as_str())
    }
}

impl From<usize> for Key<'_> {
    fn from(position: usize) -> Self {
        Key::Position(position)
    }
}

impl Display for Key<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Key::Label(label) => write!(f, "{label}"),
            Key::Position(position) => write!(f, "{position}"),
        }
    }
}
