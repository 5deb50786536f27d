//! Join tables on their labels.
//!
//! All joins are left-biased: where both tables hold a value for the same row and column, the
//! value in `self` is kept. Shared labels and divergent values are logged as warnings and
//! returned as an [`Overlap`] report.

#[cfg(test)]
mod tests;

use crate::table::pretty_list;
use crate::{Cell, Key, LabeledTable, Result};
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// Overlap
// ----------------------------------------------------------------------------

/// A shared cell whose value differs between two joined tables.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Conflict {
    pub row: String,
    pub col: String,
    /// The value in `self`, which is kept.
    pub kept: String,
    /// The value in the other table, which is discarded.
    pub discarded: String,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({}, {}): kept {}, discarded {}", self.row, self.col, self.kept, self.discarded)
    }
}

/// Labels shared by two joined tables.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Overlap {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

impl Overlap {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Joins
// ----------------------------------------------------------------------------

impl<T: Cell> LabeledTable<T> {
    /// Appends the rows of `other` that are not already in `self`.
    ///
    /// New rows are projected onto the columns of `self`, using the missing sentinel of `self`
    /// where `other` lacks a column. Existing rows are never modified.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    /// let other = LabeledTable::from_rows([["#", "x", "z"], ["A", "0", "0"], ["B", "3", "4"]])?;
    ///
    /// let overlap = table.augment(&other);
    /// assert_eq!(table.row("B")?, ["3", "#N/A"]);
    /// assert_eq!(table.row("A")?, ["1", "2"]);
    /// assert_eq!(overlap.rows, ["A"]);
    /// assert_eq!(overlap.conflicts.len(), 1);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn augment(&mut self, other: &Self) -> Overlap {
        let overlap = self.overlap(other);
        self.report_overlap(other, &overlap);
        self.append_unseen_rows(other);
        info!("{} :: augmented with rows from {}, new size is {}", self.source, other.source, self.size());
        overlap
    }

    /// Appends the columns of `other` that are not already in `self`.
    ///
    /// Values are pulled from `other` by row label, using the missing sentinel of `self` for
    /// rows that `other` lacks.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"]])?;
    /// let other = LabeledTable::from_rows([["#", "y"], ["A", "3"], ["C", "4"]])?;
    ///
    /// table.extend(&other);
    /// assert_eq!(table.col("y")?, ["3", "#N/A"]);
    /// assert_eq!(table.row_labels(), ["A", "B"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn extend(&mut self, other: &Self) -> Overlap {
        let overlap = self.overlap(other);
        self.report_overlap(other, &overlap);
        self.append_unseen_cols(other);
        info!("{} :: extended with cols from {}, new size is {}", self.source, other.source, self.size());
        overlap
    }

    /// Joins `other` onto both axes: [`extend`](Self::extend) followed by
    /// [`augment`](Self::augment).
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"]])?;
    /// let other = LabeledTable::from_rows([["#", "x", "y"], ["A", "2", "3"], ["B", "4", "5"]])?;
    ///
    /// table.merge(&other);
    /// assert_eq!(table.row("A")?, ["1", "3"]);
    /// assert_eq!(table.row("B")?, ["4", "5"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn merge(&mut self, other: &Self) -> Overlap {
        let overlap = self.overlap(other);
        self.report_overlap(other, &overlap);
        self.append_unseen_cols(other);
        self.append_unseen_rows(other);
        info!("{} :: merged with {}, new size is {}", self.source, other.source, self.size());
        overlap
    }

    /// Splits the table after the row at `key`, returning the metadata rows (up to and including
    /// `key`) and the remaining rows as new tables.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let table = LabeledTable::from_rows([["#", "S1"], ["host", "cat"], ["A", "1"], ["B", "0"]])?;
    /// let (meta, features) = table.metasplit("host")?;
    /// assert_eq!(meta.row_labels(), ["host"]);
    /// assert_eq!(features.row_labels(), ["A", "B"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn metasplit<'k>(&self, key: impl Into<Key<'k>>) -> Result<(Self, Self)> {
        let boundary = self.row_index(key)?;
        let mask = (0..self.n_rows()).map(|i| i <= boundary).collect_vec();
        let inverse = mask.iter().map(|keep| !keep).collect_vec();
        Ok((self.subset(&mask), self.subset(&inverse)))
    }

    /// Places the rows of `meta` that are not already in `self` above the rows of `self`,
    /// projected onto the columns of `self`.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut table = LabeledTable::from_rows([["#", "S1", "S2"], ["A", "1", "0"]])?;
    /// let meta = LabeledTable::from_rows([["#", "S2", "S1"], ["host", "dog", "cat"]])?;
    ///
    /// table.metamerge(&meta);
    /// assert_eq!(table.row_labels(), ["host", "A"]);
    /// assert_eq!(table.row("host")?, ["cat", "dog"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn metamerge(&mut self, meta: &Self) -> Overlap {
        let overlap = self.overlap(meta);
        self.report_overlap(meta, &overlap);

        let (labels, rows): (Vec<_>, Vec<_>) = self.project_unseen_rows(meta).into_iter().unzip();
        let features = std::mem::take(&mut self.row_labels);
        let data = std::mem::take(&mut self.data);
        self.row_labels = labels.into_iter().chain(features).collect();
        self.data = rows.into_iter().chain(data).collect();
        self.remap();

        info!("{} :: added metadata from {}, new size is {}", self.source, meta.source, self.size());
        overlap
    }

    // ------------------------------------------------------------------------
    // Helpers

    /// Returns the labels and divergent cells shared with `other`.
    fn overlap(&self, other: &Self) -> Overlap {
        let rows = self.row_labels.iter().filter(|l| other.row_map.contains_key(*l)).cloned().collect_vec();
        let cols = self.col_labels.iter().filter(|l| other.col_map.contains_key(*l)).cloned().collect_vec();

        let conflicts = rows
            .iter()
            .cartesian_product(&cols)
            .filter_map(|(row, col)| {
                let kept = &self.data[self.row_map[row]][self.col_map[col]];
                let discarded = &other.data[other.row_map[row]][other.col_map[col]];
                let same =
                    kept == discarded || (kept.is_missing(&self.missing) && discarded.is_missing(&other.missing));
                (!same).then(|| Conflict {
                    row: row.clone(),
                    col: col.clone(),
                    kept: kept.to_string(),
                    discarded: discarded.to_string(),
                })
            })
            .collect_vec();

        Overlap { rows, cols, conflicts }
    }

    fn report_overlap(&self, other: &Self, overlap: &Overlap) {
        if !overlap.rows.is_empty() {
            warn!(
                "{} :: shares {} row labels with {}: {}",
                self.source,
                overlap.rows.len(),
                other.source,
                pretty_list(&overlap.rows)
            );
        }
        if !overlap.cols.is_empty() {
            warn!(
                "{} :: shares {} col labels with {}: {}",
                self.source,
                overlap.cols.len(),
                other.source,
                pretty_list(&overlap.cols)
            );
        }
        if !overlap.conflicts.is_empty() {
            warn!(
                "{} :: kept {} values that differ in {}: {}",
                self.source,
                overlap.conflicts.len(),
                other.source,
                pretty_list(&overlap.conflicts)
            );
        }
    }

    /// Returns the rows of `other` not in `self`, projected onto the columns of `self`.
    fn project_unseen_rows(&self, other: &Self) -> Vec<(String, Vec<T>)> {
        other
            .iter_rows()
            .filter(|(label, _)| !self.row_map.contains_key(*label))
            .map(|(label, row)| {
                let projected = self
                    .col_labels
                    .iter()
                    .map(|col| match other.col_map.get(col) {
                        Some(&j) => row[j].clone(),
                        None => self.missing.clone(),
                    })
                    .collect_vec();
                (label.to_string(), projected)
            })
            .collect()
    }

    fn append_unseen_rows(&mut self, other: &Self) {
        for (label, row) in self.project_unseen_rows(other) {
            self.row_labels.push(label);
            self.data.push(row);
        }
        self.remap();
    }

    fn append_unseen_cols(&mut self, other: &Self) {
        let seen = self.col_labels.iter().cloned().collect::<HashSet<_>>();
        let unseen = other.col_labels.iter().enumerate().filter(|(_, l)| !seen.contains(*l)).collect_vec();

        for (label, row) in self.row_labels.iter().zip(self.data.iter_mut()) {
            let source = other.row_map.get(label).map(|&i| &other.data[i]);
            row.extend(unseen.iter().map(|(j, _)| match source {
                Some(values) => values[*j].clone(),
                None => self.missing.clone(),
            }));
        }
        self.col_labels.extend(unseen.into_iter().map(|(_, l)| l.clone()));
        self.remap();
    }
}
