//! Keep or drop the rows (or columns) of a [`LabeledTable`] that satisfy a predicate.
//!
//! Every filter is a specialization of [`LabeledTable::filter_rows`], and every filter accepts the
//! same [`Options`]:
//!
//! - `transposed` - Filter columns instead of rows.
//! - `invert` - Keep exactly the rows the predicate would otherwise drop.
//! - `return_new` - Leave the table untouched and return the kept rows as a new table.

#[cfg(test)]
mod tests;

use crate::table::pretty_list;
use crate::{Cell, Error, Key, LabeledTable, Result};
use log::info;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ----------------------------------------------------------------------------
// Options
// ----------------------------------------------------------------------------

/// Options shared by the filter, grouping, and stratify operations.
///
/// ```
/// use tabkit_table::Options;
/// let options = Options::default().transposed(true).return_new(true);
/// assert!(options.transposed && options.return_new && !options.invert);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Options {
    /// Apply the operation to columns instead of rows.
    pub transposed: bool,
    /// Keep the complement of what the predicate selects (filters only).
    pub invert: bool,
    /// Return a new table and leave `self` unmodified.
    pub return_new: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn return_new(mut self, return_new: bool) -> Self {
        self.return_new = return_new;
        self
    }
}

// ----------------------------------------------------------------------------
// RowView
// ----------------------------------------------------------------------------

/// A borrowed view of one row, passed to filter predicates.
#[derive(Debug)]
pub struct RowView<'t, T> {
    pub(crate) table: &'t LabeledTable<T>,
    pub(crate) index: usize,
}

impl<'t, T: Cell> RowView<'t, T> {
    pub fn label(&self) -> &'t str {
        &self.table.row_labels[self.index]
    }

    /// 0-based position of the row in the table.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &'t [T] {
        &self.table.data[self.index]
    }

    /// The table this row belongs to.
    pub fn table(&self) -> &'t LabeledTable<T> {
        self.table
    }

    /// Returns the value in column `col`.
    pub fn get<'k>(&self, col: impl Into<Key<'k>>) -> Result<&'t T> {
        let j = self.table.col_index(col)?;
        Ok(&self.values()[j])
    }

    /// Returns the value in the focus column as text, or the row label if there is no focus.
    pub fn focus(&self, focus: Option<Key>) -> Result<String> {
        match focus {
            Some(col) => Ok(self.get(col)?.to_string()),
            None => Ok(self.label().to_string()),
        }
    }

    /// Returns the value in column `col` as a number.
    pub fn number<'k>(&self, col: impl Into<Key<'k>>) -> Result<f64> {
        parse_number(&self.get(col)?.to_string())
    }
}

/// Parses text as a number, ignoring surrounding whitespace.
///
/// ```
/// use tabkit_table::filter::parse_number;
/// assert_eq!(parse_number(" 2.5")?, 2.5);
/// assert!(parse_number("#N/A").is_err());
/// # Ok::<(), tabkit_table::Error>(())
/// ```
pub fn parse_number(value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|e| Error::Parse {
        string: value.to_string(),
        context: "a number",
        reason: e.to_string(),
    })
}

// ----------------------------------------------------------------------------
// Criterion
// ----------------------------------------------------------------------------

/// A numeric comparison operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparator {
    pub fn compare(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Lt => value < threshold,
            Comparator::Le => value <= threshold,
            Comparator::Gt => value > threshold,
            Comparator::Ge => value >= threshold,
            Comparator::Eq => value == threshold,
            Comparator::Ne => value != threshold,
        }
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let comparator = match s {
            "<" => Comparator::Lt,
            "<=" => Comparator::Le,
            ">" => Comparator::Gt,
            ">=" => Comparator::Ge,
            "=" | "==" => Comparator::Eq,
            "!=" => Comparator::Ne,
            _ => {
                return Err(Error::Parse {
                    string: s.to_string(),
                    context: "a comparison operator",
                    reason: "Options: <, <=, >, >=, ==, !=".to_string(),
                })
            }
        };
        Ok(comparator)
    }
}

impl Display for Comparator {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let op = match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
        };
        write!(f, "{op}")
    }
}

/// A numeric threshold criterion such as `>=10` or `< 0.05`.
///
/// ```
/// use tabkit_table::{Comparator, Criterion};
///
/// let criterion: Criterion = ">= 10".parse()?;
/// assert_eq!(criterion, Criterion { comparator: Comparator::Ge, threshold: 10.0 });
/// assert!(criterion.matches(10.0));
/// assert!("~10".parse::<Criterion>().is_err());
/// # Ok::<(), tabkit_table::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Criterion {
    pub comparator: Comparator,
    pub threshold: f64,
}

impl Criterion {
    pub fn matches(&self, value: f64) -> bool {
        self.comparator.compare(value, self.threshold)
    }
}

impl FromStr for Criterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| !"<>=!".contains(c)).unwrap_or(s.len());
        let (op, threshold) = s.split_at(split);
        if op.is_empty() {
            return Err(Error::Parse {
                string: s.to_string(),
                context: "a limit criterion",
                reason: "Missing comparison operator (ex. '>=10').".to_string(),
            });
        }
        let comparator = op.parse()?;
        let threshold = parse_number(threshold)?;
        Ok(Criterion { comparator, threshold })
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.comparator, self.threshold)
    }
}

// ----------------------------------------------------------------------------
// Filters
// ----------------------------------------------------------------------------

impl<T: Cell> LabeledTable<T> {
    /// Resolves `key` against the rows a filter iterates over, the columns of `self` when
    /// transposed.
    pub(crate) fn filtered_index(&self, key: Key, options: Options) -> Result<usize> {
        if options.transposed {
            self.col_index(key)
        } else {
            self.row_index(key)
        }
    }

    /// Resolves `key` against the values of each filtered row, the rows of `self` when transposed.
    pub(crate) fn field_index(&self, key: Key, options: Options) -> Result<usize> {
        if options.transposed {
            self.row_index(key)
        } else {
            self.col_index(key)
        }
    }

    fn resolve_focus(&self, focus: Option<Key>, options: Options) -> Result<Option<Key<'static>>> {
        focus.map(|key| self.field_index(key, options).map(Key::Position)).transpose()
    }

    /// Keeps the rows for which `predicate` returns true.
    ///
    /// Returns `Some(table)` holding the kept rows when [`Options::return_new`] is set, otherwise
    /// filters `self` in place and returns [`None`].
    ///
    /// ## Errors
    ///
    /// Returns the first error raised by `predicate`. The table is left unmodified.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::{LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"], ["C", "3"]])?;
    /// let odd = table.filter_rows(|row| Ok(row.position() % 2 == 0), Options::new().return_new(true))?;
    ///
    /// assert_eq!(odd.unwrap().row_labels(), ["A", "C"]);
    /// assert_eq!(table.n_rows(), 3);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn filter_rows<F>(&mut self, mut predicate: F, options: Options) -> Result<Option<Self>>
    where
        F: FnMut(&RowView<T>) -> Result<bool>,
    {
        self.with_orientation(options.transposed, |table| {
            let view: &Self = table;
            let mask = (0..view.n_rows())
                .map(|index| predicate(&RowView { table: view, index }).map(|keep| keep != options.invert))
                .collect::<Result<Vec<bool>>>()?;

            if options.return_new {
                let mut new = table.subset(&mask);
                if options.transposed {
                    new.transpose();
                }
                Ok(Some(new))
            } else {
                table.retain(&mask);
                Ok(None)
            }
        })
        .map(|new| {
            if new.is_none() {
                info!("{} :: new size is {}", self.source, self.size());
            }
            new
        })
    }

    /// Keeps rows where any regular expression in `patterns` matches the focal value.
    ///
    /// The focal value is the row label, or the value in column `focus`. Patterns match anywhere
    /// in the value (ex. `B` matches `ABC`).
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::{Key, LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "0"], ["C", "1"]])?;
    ///
    /// let matched = table.grep(&["B|C"], None, Options::new().return_new(true))?.unwrap();
    /// assert_eq!(matched.row_labels(), ["B", "C"]);
    ///
    /// table.grep(&["1"], Some(Key::from("x")), Options::default())?;
    /// assert_eq!(table.row_labels(), ["A", "C"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn grep<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
        focus: Option<Key>,
        options: Options,
    ) -> Result<Option<Self>> {
        let patterns = patterns.iter().map(|p| p.as_ref()).collect::<Vec<_>>();
        let set = RegexSet::new(&patterns).map_err(|e| Error::Parse {
            string: patterns.join(" "),
            context: "regular expressions",
            reason: e.to_string(),
        })?;
        info!(
            "{} :: applying grep focus={} patterns={} {options:?}",
            self.source,
            focus_name(focus),
            pretty_list(&patterns)
        );
        let focus = self.resolve_focus(focus, options)?;
        self.filter_rows(|row| Ok(set.is_match(&row.focus(focus)?)), options)
    }

    /// Keeps rows whose focal value is exactly one of `values`.
    ///
    /// ```
    /// use tabkit_table::{Key, LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x", "y"], ["A", "0", "1"], ["B", "1", "0"]])?;
    /// table.select(&["0"], Some(Key::from("x")), Options::default())?;
    /// assert_eq!(table.row_labels(), ["A"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn select<S: AsRef<str>>(
        &mut self,
        values: &[S],
        focus: Option<Key>,
        options: Options,
    ) -> Result<Option<Self>> {
        let choices = values.iter().map(|v| v.as_ref()).collect::<HashSet<_>>();
        info!(
            "{} :: applying select focus={} choices={} {options:?}",
            self.source,
            focus_name(focus),
            pretty_list(values.iter().map(|v| v.as_ref()))
        );
        let focus = self.resolve_focus(focus, options)?;
        self.filter_rows(|row| Ok(choices.contains(row.focus(focus)?.as_str())), options)
    }

    /// Drops rows whose focal value is exactly one of `values`, the complement of
    /// [`select`](Self::select).
    pub fn delete<S: AsRef<str>>(
        &mut self,
        values: &[S],
        focus: Option<Key>,
        options: Options,
    ) -> Result<Option<Self>> {
        let choices = values.iter().map(|v| v.as_ref()).collect::<HashSet<_>>();
        info!(
            "{} :: applying delete focus={} choices={} {options:?}",
            self.source,
            focus_name(focus),
            pretty_list(values.iter().map(|v| v.as_ref()))
        );
        let focus = self.resolve_focus(focus, options)?;
        self.filter_rows(|row| Ok(!choices.contains(row.focus(focus)?.as_str())), options)
    }

    /// Keeps rows from the first row up to and including the row at `key`.
    ///
    /// ```
    /// use tabkit_table::{LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"], ["C", "3"]])?;
    /// table.head("B", Options::default())?;
    /// assert_eq!(table.row_labels(), ["A", "B"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn head<'k>(&mut self, key: impl Into<Key<'k>>, options: Options) -> Result<Option<Self>> {
        let key = key.into();
        info!("{} :: applying head on {key} {options:?}", self.source);
        let boundary = self.filtered_index(key, options)?;
        self.filter_rows(|row| Ok(row.position() <= boundary), options)
    }

    /// Keeps rows whose value in `col`, as a number, satisfies `criterion` (ex. `">=10"`).
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Parse`] if the criterion is malformed or a focal value is not numeric.
    ///
    /// ```
    /// use tabkit_table::{Error, LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "n"], ["A", "5"], ["B", "10"], ["C", "20"]])?;
    /// table.limit("n", ">=10", Options::default())?;
    /// assert_eq!(table.row_labels(), ["B", "C"]);
    ///
    /// let result = table.limit("n", "=>10", Options::default());
    /// assert!(matches!(result, Err(Error::Parse { .. })));
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn limit<'k>(&mut self, col: impl Into<Key<'k>>, criterion: &str, options: Options) -> Result<Option<Self>> {
        let col = col.into();
        let criterion: Criterion = criterion.parse()?;
        info!("{} :: applying limit, requiring {col} to be {criterion} {options:?}", self.source);
        let j = self.field_index(col, options)?;
        self.filter_rows(|row| Ok(criterion.matches(row.number(j)?)), options)
    }

    /// Keeps rows with at least `min_count` values greater than or equal to `min_value`.
    ///
    /// Missing values never count toward `min_count`.
    ///
    /// ```
    /// use tabkit_table::{LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "S1", "S2"], ["A", "0", "0"], ["B", "0", "3"]])?;
    /// table.nontrivial(1, 1e-20, Options::default())?;
    /// assert_eq!(table.row_labels(), ["B"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn nontrivial(&mut self, min_count: usize, min_value: f64, options: Options) -> Result<Option<Self>> {
        info!(
            "{} :: applying nontrivial requiring at least {min_count} values exceeding {min_value} {options:?}",
            self.source
        );
        self.filter_rows(
            |row| {
                let missing = row.table().missing();
                let numbers = row
                    .values()
                    .iter()
                    .filter(|v| !v.is_missing(missing))
                    .map(|v| parse_number(&v.to_string()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(numbers.into_iter().filter(|n| *n >= min_value).count() >= min_count)
            },
            options,
        )
    }
}

fn focus_name(focus: Option<Key>) -> String {
    focus.map(|key| key.to_string()).unwrap_or_else(|| "<label>".to_string())
}
