//! The [`LabeledTable`] container: construction, indexed access, and in-place transformations.


use crate::{Axis, Cell, Error, Key, Result, DUP_SUFFIX, ORIGIN};
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter};

/// Number of items shown before a list is abbreviated in log messages.
const MAX_PRINT: usize = 5;

/// A two-dimensional table with named rows and named columns.
///
/// - Row and column labels are unique within their axis. Colliding labels are renamed by
///   appending [`DUP_SUFFIX`](crate::DUP_SUFFIX).
/// - Every row holds exactly one value (`T`) per column label.
///
/// ## Examples
///
/// ```
/// use tabkit_table::LabeledTable;
///
/// let table = LabeledTable::new(
///     vec!["A".to_string(), "B".to_string()],
///     vec!["x".to_string(), "y".to_string()],
///     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
/// )?;
///
/// assert_eq!(table.get("B", "x")?, 3.0);
/// assert_eq!(table.get(0usize, 1usize)?, 2.0);
/// # Ok::<(), tabkit_table::Error>(())
/// ```
///
/// | # | x | y |
/// |---|---|---|
/// | A | 1 | 2 |
/// | B | 3 | 4 |
#[derive(Clone, Debug, Serialize)]
pub struct LabeledTable<T> {
    pub(crate) row_labels: Vec<String>,
    pub(crate) col_labels: Vec<String>,
    pub(crate) data: Vec<Vec<T>>,
    pub(crate) origin: String,
    pub(crate) missing: T,
    pub(crate) transposed: bool,
    #[serde(skip)]
    pub(crate) source: String,
    #[serde(skip)]
    pub(crate) row_map: HashMap<String, usize>,
    #[serde(skip)]
    pub(crate) col_map: HashMap<String, usize>,
}

impl<T: Cell> PartialEq for LabeledTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.row_labels == other.row_labels
            && self.col_labels == other.col_labels
            && self.origin == other.origin
            && self.transposed == other.transposed
            && self.missing.is_missing(&other.missing)
            && self.data.iter().zip(&other.data).all(|(a, b)| {
                a.iter().zip(b).all(|(a, b)| a == b || (a.is_missing(&self.missing) && b.is_missing(&other.missing)))
            })
    }
}

impl<T: Cell> Display for LabeledTable<T> {
    /// Tab-delimited text, identical to what [`LabeledTable::write_to`] produces.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let header = std::iter::once(self.origin.as_str())
            .chain(self.col_labels.iter().map(String::as_str))
            .join("\t");
        writeln!(f, "{header}")?;
        for (label, row) in self.iter_rows() {
            let line = std::iter::once(label.to_string()).chain(row.iter().map(|v| v.to_string())).join("\t");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Renames colliding labels in place, returns true if any label was renamed.
pub(crate) fn deduplicate(labels: &mut [String]) -> bool {
    let mut seen = HashSet::new();
    let mut renamed = false;
    for label in labels.iter_mut() {
        while seen.contains(label.as_str()) {
            label.push_str(DUP_SUFFIX);
            renamed = true;
        }
        seen.insert(label.clone());
    }
    renamed
}

/// Abbreviates a list for log messages.
pub(crate) fn pretty_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Display,
{
    let items = items.into_iter().map(|s| s.to_string()).collect_vec();
    if items.len() > MAX_PRINT {
        let extra = items.len() - MAX_PRINT;
        format!("[{}, & {extra} others]", items[0..MAX_PRINT].join(", "))
    } else {
        format!("[{}]", items.join(", "))
    }
}

impl<T: Cell> LabeledTable<T> {
    /// Returns a new [`LabeledTable`] assembled from labels and rows of values.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Format`] if the number of rows does not match the number of row labels,
    /// or if any row does not have one value per column label.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let table = LabeledTable::new(vec!["A".into()], vec!["x".into()], vec![vec!["1".to_string()]])?;
    /// assert_eq!(table.size(), "<1 ROW x 1 COL>");
    ///
    /// let ragged = LabeledTable::new(vec!["A".into()], vec!["x".into()], vec![vec!["1".to_string(), "2".to_string()]]);
    /// assert!(ragged.is_err());
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn new(row_labels: Vec<String>, col_labels: Vec<String>, data: Vec<Vec<T>>) -> Result<Self> {
        Self::assemble("<runtime>", ORIGIN.to_string(), T::missing(), row_labels, col_labels, data)
    }

    /// Validates the shape of the data, deduplicates labels, and builds the label maps.
    pub(crate) fn assemble(
        source: &str,
        origin: String,
        missing: T,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        data: Vec<Vec<T>>,
    ) -> Result<Self> {
        let mut table = LabeledTable {
            row_labels,
            col_labels,
            data,
            origin,
            missing,
            transposed: false,
            source: source.to_string(),
            row_map: HashMap::new(),
            col_map: HashMap::new(),
        };
        table.validate()?;
        table.remap();
        debug!("{} :: New table with size {}.", table.source, table.size());
        Ok(table)
    }

    /// Returns a new table that shares this table's metadata but holds different labels and data.
    ///
    /// The caller guarantees the data is rectangular and aligned to the labels.
    pub(crate) fn sibling<U: Cell>(
        &self,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        data: Vec<Vec<U>>,
        missing: U,
    ) -> LabeledTable<U> {
        let mut table = LabeledTable {
            row_labels,
            col_labels,
            data,
            origin: self.origin.clone(),
            missing,
            transposed: self.transposed,
            source: self.source.clone(),
            row_map: HashMap::new(),
            col_map: HashMap::new(),
        };
        table.remap();
        table
    }

    /// Returns a new table holding the rows where `mask` is true.
    pub(crate) fn subset(&self, mask: &[bool]) -> Self {
        let (row_labels, data): (Vec<_>, Vec<_>) = self
            .row_labels
            .iter()
            .zip(&self.data)
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|((label, row), _)| (label.clone(), row.clone()))
            .unzip();
        self.sibling(row_labels, self.col_labels.clone(), data, self.missing.clone())
    }

    /// Keeps only the rows where `mask` is true.
    pub(crate) fn retain(&mut self, mask: &[bool]) {
        let (row_labels, data): (Vec<_>, Vec<_>) = std::mem::take(&mut self.row_labels)
            .into_iter()
            .zip(std::mem::take(&mut self.data))
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(pair, _)| pair)
            .unzip();
        self.row_labels = row_labels;
        self.data = data;
        self.remap();
    }

    /// Runs `f` with the table transposed (if requested), then restores the orientation.
    ///
    /// Index errors raised while transposed are reported against the original axis.
    pub(crate) fn with_orientation<R, F>(&mut self, transposed: bool, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        if !transposed {
            return f(self);
        }
        self.transpose();
        let result = f(self);
        self.transpose();
        result.map_err(Error::flip_axis)
    }

    // ------------------------------------------------------------------------
    // Builder

    /// Sets the corner cell written above the row labels.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the value used to fill cells that have no source value after a join.
    pub fn with_missing(mut self, missing: T) -> Self {
        self.missing = missing;
        self
    }

    // ------------------------------------------------------------------------
    // Accessors

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn missing(&self) -> &T {
        &self.missing
    }

    /// Where the table was loaded from (ex. `<data.tsv>`, `<nested mapping>`).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True if the table has been transposed an odd number of times.
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.col_labels.is_empty()
    }

    /// Returns a short description of the table dimensions.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    /// assert_eq!(table.size(), "<1 ROW x 2 COL>");
    /// table.transpose();
    /// assert_eq!(table.size(), "<2 ROW x 1 COL (transposed)>");
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn size(&self) -> String {
        format!(
            "<{} ROW x {} COL{}>",
            self.n_rows(),
            self.n_cols(),
            if self.transposed { " (transposed)" } else { "" }
        )
    }

    // ------------------------------------------------------------------------
    // Integrity

    /// Checks that the data is rectangular and aligned to the labels.
    fn validate(&self) -> Result<()> {
        if self.data.len() != self.row_labels.len() {
            return Err(Error::Format {
                table: self.source.clone(),
                reason: format!(
                    "Row labels ({}) do not align to data ({} rows).",
                    self.row_labels.len(),
                    self.data.len()
                ),
            });
        }
        let n_cols = self.col_labels.len();
        if let Some((label, row)) = self.row_labels.iter().zip(&self.data).find(|(_, row)| row.len() != n_cols) {
            return Err(Error::Format {
                table: self.source.clone(),
                reason: format!("Row '{label}' has {} values, expected {n_cols}.", row.len()),
            });
        }
        Ok(())
    }

    /// Deduplicates labels and rebuilds the label-to-index maps.
    ///
    /// Must run after every structural change (transpose, filter, sort, relabel).
    pub(crate) fn remap(&mut self) {
        if deduplicate(&mut self.row_labels) {
            warn!("{} :: Some row labels were deduplicated.", self.source);
        }
        if deduplicate(&mut self.col_labels) {
            warn!("{} :: Some col labels were deduplicated.", self.source);
        }
        self.row_map = self.row_labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
        self.col_map = self.col_labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
    }

    /// Checks every structural invariant of the table.
    ///
    /// This should never fail for a table built and modified through the public API.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"]])?;
    /// table.transpose();
    /// table.check_integrity()?;
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn check_integrity(&self) -> Result<()> {
        self.validate()?;
        let stale = |labels: &[String], map: &HashMap<String, usize>| {
            labels.len() != map.len() || labels.iter().enumerate().any(|(i, l)| map.get(l) != Some(&i))
        };
        if stale(&self.row_labels, &self.row_map) || stale(&self.col_labels, &self.col_map) {
            return Err(Error::Format {
                table: self.source.clone(),
                reason: "Label maps are stale or labels are not unique.".to_string(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Indexed Access

    /// Returns the 0-based position of a row, addressed by label or position.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::{Error, LabeledTable};
    /// let table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"]])?;
    ///
    /// assert_eq!(table.row_index("B")?, 1);
    /// assert_eq!(table.row_index(0usize)?, 0);
    /// assert!(matches!(table.row_index("C"), Err(Error::BadIndex { .. })));
    /// assert!(matches!(table.row_index(2usize), Err(Error::BadIndex { .. })));
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn row_index<'k>(&self, key: impl Into<Key<'k>>) -> Result<usize> {
        self.index(Axis::Row, key.into())
    }

    /// Returns the 0-based position of a column, addressed by label or position.
    pub fn col_index<'k>(&self, key: impl Into<Key<'k>>) -> Result<usize> {
        self.index(Axis::Col, key.into())
    }

    fn index(&self, axis: Axis, key: Key) -> Result<usize> {
        let (labels, map) = match axis {
            Axis::Row => (&self.row_labels, &self.row_map),
            Axis::Col => (&self.col_labels, &self.col_map),
        };
        let index = match key {
            Key::Position(i) if i < labels.len() => Some(i),
            Key::Position(_) => None,
            Key::Label(label) => map.get(label).copied(),
        };
        index.ok_or_else(|| Error::BadIndex { table: self.source.clone(), axis, index: key.to_string() })
    }

    /// Returns a copy of the values in a row.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    /// let mut row = table.row("A")?;
    /// row[0] = "changed".to_string();
    /// assert_eq!(table.row("A")?, ["1", "2"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn row<'k>(&self, key: impl Into<Key<'k>>) -> Result<Vec<T>> {
        let i = self.row_index(key)?;
        Ok(self.data[i].clone())
    }

    /// Returns a copy of the values in a column.
    pub fn col<'k>(&self, key: impl Into<Key<'k>>) -> Result<Vec<T>> {
        let j = self.col_index(key)?;
        Ok(self.data.iter().map(|row| row[j].clone()).collect())
    }

    /// Returns a copy of the value at a row and column.
    pub fn get<'r, 'c>(&self, row: impl Into<Key<'r>>, col: impl Into<Key<'c>>) -> Result<T> {
        let i = self.row_index(row)?;
        let j = self.col_index(col)?;
        Ok(self.data[i][j].clone())
    }

    /// Sets the value at a row and column.
    pub fn set<'r, 'c>(&mut self, row: impl Into<Key<'r>>, col: impl Into<Key<'c>>, value: T) -> Result<()> {
        let i = self.row_index(row)?;
        let j = self.col_index(col)?;
        self.data[i][j] = value;
        Ok(())
    }

    /// Returns a row as a mapping of column label to value.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    /// let row = table.row_as_map("A")?;
    /// assert_eq!(row["y"], "2");
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn row_as_map<'k>(&self, key: impl Into<Key<'k>>) -> Result<BTreeMap<String, T>> {
        let row = self.row(key)?;
        Ok(self.col_labels.iter().cloned().zip(row).collect())
    }

    /// Returns a column as a mapping of row label to value.
    pub fn col_as_map<'k>(&self, key: impl Into<Key<'k>>) -> Result<BTreeMap<String, T>> {
        let col = self.col(key)?;
        Ok(self.row_labels.iter().cloned().zip(col).collect())
    }

    /// Iterates over (row label, row values).
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[T])> + '_ {
        self.row_labels.iter().map(String::as_str).zip(self.data.iter().map(Vec::as_slice))
    }

    /// Iterates over (column label, column values).
    pub fn iter_cols(&self) -> impl Iterator<Item = (&str, Vec<T>)> + '_ {
        self.col_labels
            .iter()
            .enumerate()
            .map(move |(j, label)| (label.as_str(), self.data.iter().map(|row| row[j].clone()).collect()))
    }

    /// Iterates over (row label, column label, value) in row-major order.
    pub fn iter_entries(&self) -> impl Iterator<Item = (&str, &str, &T)> + '_ {
        self.iter_rows().flat_map(move |(r, row)| {
            self.col_labels.iter().zip(row).map(move |(c, value)| (r, c.as_str(), value))
        })
    }

    // ------------------------------------------------------------------------
    // Adding Rows and Columns

    /// Appends a new labeled row.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "1", "2", "3"], ["A", "a", "b", "c"]])?;
    /// table.add_row("B", ["d", "e", "f"].map(String::from))?;
    /// assert_eq!(table.row("B")?, ["d", "e", "f"]);
    /// assert!(table.add_row("C", vec!["g".to_string()]).is_err());
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn add_row<I>(&mut self, label: impl Into<String>, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let row = row.into_iter().collect_vec();
        self.check_row_len(row.len())?;
        self.row_labels.push(label.into());
        self.data.push(row);
        self.remap();
        Ok(())
    }

    /// Appends a new labeled column.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "1", "2", "3"], ["A", "a", "b", "c"]])?;
    /// table.add_col("4", ["d".to_string()])?;
    /// assert_eq!(table.col("4")?, ["d"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn add_col<I>(&mut self, label: impl Into<String>, col: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let col = col.into_iter().collect_vec();
        if col.len() != self.n_rows() {
            return Err(Error::Format {
                table: self.source.clone(),
                reason: format!("New column size ({}) does not match existing table ({}).", col.len(), self.n_rows()),
            });
        }
        self.col_labels.push(label.into());
        self.data.iter_mut().zip(col).for_each(|(row, value)| row.push(value));
        self.remap();
        Ok(())
    }

    /// Inserts a new labeled row before the row at `key`.
    pub fn insert<'k, I>(&mut self, key: impl Into<Key<'k>>, label: impl Into<String>, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let i = self.row_index(key)?;
        let row = row.into_iter().collect_vec();
        self.check_row_len(row.len())?;
        self.row_labels.insert(i, label.into());
        self.data.insert(i, row);
        self.remap();
        Ok(())
    }

    fn check_row_len(&self, len: usize) -> Result<()> {
        if len != self.n_cols() {
            return Err(Error::Format {
                table: self.source.clone(),
                reason: format!("New row size ({len}) does not match existing table ({}).", self.n_cols()),
            });
        }
        Ok(())
    }

    /// Removes a row and uses its values as the new column labels.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "1", "2"], ["name", "x", "y"], ["A", "a", "b"]])?;
    /// table.promote("name")?;
    /// assert_eq!(table.col_labels(), ["x", "y"]);
    /// assert_eq!(table.row_labels(), ["A"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn promote<'k>(&mut self, key: impl Into<Key<'k>>) -> Result<()> {
        let i = self.row_index(key)?;
        self.row_labels.remove(i);
        let row = self.data.remove(i);
        self.col_labels = row.iter().map(ToString::to_string).collect();
        self.remap();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transformation

    /// Swaps rows and columns in place.
    ///
    /// Transposing twice restores the original table.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let original = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    /// let mut table = original.clone();
    ///
    /// table.transpose();
    /// assert_eq!(table.row_labels(), ["x", "y"]);
    /// assert_eq!(table.col("A")?, ["1", "2"]);
    ///
    /// table.transpose();
    /// assert_eq!(table, original);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn transpose(&mut self) {
        let n_rows = self.n_rows();
        let mut data: Vec<Vec<T>> = (0..self.n_cols()).map(|_| Vec::with_capacity(n_rows)).collect();
        for row in std::mem::take(&mut self.data) {
            data.iter_mut().zip(row).for_each(|(col, value)| col.push(value));
        }
        self.data = data;
        std::mem::swap(&mut self.row_labels, &mut self.col_labels);
        std::mem::swap(&mut self.row_map, &mut self.col_map);
        self.transposed = !self.transposed;
        debug!("{} :: Transposed the table.", self.source);
    }

    /// Sorts rows lexicographically by label.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["b", "1"], ["C", "2"], ["a", "3"]])?;
    /// table.sort_rows();
    /// assert_eq!(table.row_labels(), ["C", "a", "b"]);
    /// assert_eq!(table.col("x")?, ["2", "3", "1"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn sort_rows(&mut self) {
        let (row_labels, data): (Vec<_>, Vec<_>) = std::mem::take(&mut self.row_labels)
            .into_iter()
            .zip(std::mem::take(&mut self.data))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .unzip();
        self.row_labels = row_labels;
        self.data = data;
        self.remap();
    }

    /// Reorders rows to exactly the labels in `order`; rows not listed are dropped.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::BadIndex`] if `order` contains an unknown label, and leaves the table
    /// unchanged.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"], ["C", "3"]])?;
    /// table.reorder_rows(&["C", "A"])?;
    /// assert_eq!(table.row_labels(), ["C", "A"]);
    /// assert!(table.reorder_rows(&["B"]).is_err());
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn reorder_rows<S: AsRef<str>>(&mut self, order: &[S]) -> Result<()> {
        let indices = order.iter().map(|label| self.row_index(label.as_ref())).collect::<Result<Vec<_>>>()?;
        self.data = indices.iter().map(|&i| self.data[i].clone()).collect();
        self.row_labels = order.iter().map(|label| label.as_ref().to_string()).collect();
        self.remap();
        Ok(())
    }

    /// Sorts columns lexicographically by label, by way of [`sort_rows`](Self::sort_rows) on the
    /// transposed table.
    pub fn sort_cols(&mut self) {
        self.transpose();
        self.sort_rows();
        self.transpose();
    }

    /// Reorders columns to exactly the labels in `order`; columns not listed are dropped.
    pub fn reorder_cols<S: AsRef<str>>(&mut self, order: &[S]) -> Result<()> {
        self.with_orientation(true, |table| table.reorder_rows(order))
    }

    // ------------------------------------------------------------------------
    // Apply Functions

    /// Replaces every value with `f(value)`.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    /// table.apply_to_cells(|v| format!("-{v}"));
    /// assert_eq!(table.row("A")?, ["-1", "-2"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn apply_to_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        self.data.iter_mut().flatten().for_each(|value| *value = f(value));
    }

    /// Replaces every value in one row with `f(value)`.
    pub fn apply_to_row<'k, F>(&mut self, key: impl Into<Key<'k>>, mut f: F) -> Result<()>
    where
        F: FnMut(&T) -> T,
    {
        let i = self.row_index(key)?;
        self.data[i].iter_mut().for_each(|value| *value = f(value));
        Ok(())
    }

    /// Replaces every value in one column with `f(value)`.
    pub fn apply_to_col<'k, F>(&mut self, key: impl Into<Key<'k>>, mut f: F) -> Result<()>
    where
        F: FnMut(&T) -> T,
    {
        let j = self.col_index(key)?;
        self.data.iter_mut().for_each(|row| row[j] = f(&row[j]));
        Ok(())
    }

    /// Relabels every row with `f(label)`, deduplicating any collisions.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["a", "2"]])?;
    /// table.apply_to_row_labels(|label| label.to_uppercase());
    /// assert_eq!(table.row_labels(), ["A", "A-dup"]);
    /// assert_eq!(table.get("A-dup", "x")?, "2");
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn apply_to_row_labels<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        self.row_labels = self.row_labels.iter().map(|label| f(label)).collect();
        self.remap();
    }

    /// Relabels every column with `f(label)`, deduplicating any collisions.
    pub fn apply_to_col_labels<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        self.col_labels = self.col_labels.iter().map(|label| f(label)).collect();
        self.remap();
    }

    /// Returns a new table of a different cell type, with every value mapped by `f`.
    ///
    /// The new table's missing sentinel is the default for `U`.
    pub fn map_cells<U, F>(&self, mut f: F) -> LabeledTable<U>
    where
        U: Cell,
        F: FnMut(&T) -> U,
    {
        let data = self.data.iter().map(|row| row.iter().map(&mut f).collect()).collect();
        self.sibling(self.row_labels.clone(), self.col_labels.clone(), data, U::missing())
    }

    /// Like [`map_cells`](Self::map_cells), for a fallible `f`.
    pub fn try_map_cells<U, F>(&self, mut f: F) -> Result<LabeledTable<U>>
    where
        U: Cell,
        F: FnMut(&T) -> Result<U>,
    {
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(&mut f).collect::<Result<Vec<U>>>())
            .collect::<Result<Vec<_>>>()?;
        Ok(self.sibling(self.row_labels.clone(), self.col_labels.clone(), data, U::missing()))
    }

    // ------------------------------------------------------------------------
    // Conversion

    /// Returns the table as a nested mapping of row label, then column label, to value.
    pub fn to_nested_map(&self) -> BTreeMap<String, BTreeMap<String, T>> {
        self.iter_rows()
            .map(|(label, row)| (label.to_string(), self.col_labels.iter().cloned().zip(row.iter().cloned()).collect()))
            .collect()
    }

    /// Returns the table as a mapping of (row label, column label) to value.
    pub fn to_tuple_map(&self) -> HashMap<(String, String), T> {
        self.iter_entries().map(|(r, c, value)| ((r.to_string(), c.to_string()), value.clone())).collect()
    }

    /// Returns the sorted set of distinct values in the table.
    pub fn distinct_values(&self) -> BTreeSet<String> {
        self.data.iter().flatten().map(ToString::to_string).collect()
    }

    /// Convert table to markdown format.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let table = LabeledTable::from_rows([["#", "1", "2"], ["A", "B", "C"]])?;
    /// let expected = "| # | 1 | 2 |\n|---|---|---|\n| A | B | C |\n";
    /// assert_eq!(table.to_markdown(), expected);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn to_markdown(&self) -> String {
        let header = std::iter::once(self.origin.clone()).chain(self.col_labels.iter().cloned()).collect_vec();
        let rows = self
            .iter_rows()
            .map(|(label, row)| {
                std::iter::once(label.to_string()).chain(row.iter().map(|v| v.to_string())).collect_vec()
            })
            .collect_vec();

        // the maximum width of each column, +2 to add space on either side
        let col_widths = header
            .iter()
            .enumerate()
            .map(|(j, cell)| rows.iter().map(|row| row[j].len()).chain([cell.len()]).max().unwrap_or(0) + 2)
            .collect_vec();

        let line = |cells: &[String]| {
            let cells = cells.iter().zip(&col_widths).map(|(cell, &width)| format!("{cell:^width$}")).join("|");
            format!("|{cells}|\n")
        };

        let mut markdown = line(&header);
        // frame in between headers and rows
        let frame = col_widths.iter().map(|width| "-".repeat(*width)).join("|");
        markdown.push_str(&format!("|{frame}|\n"));
        rows.iter().for_each(|row| markdown.push_str(&line(row)));
        markdown
    }
}
