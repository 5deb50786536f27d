//! Conversion between text and numeric tables, and column-wise numeric transforms.


use crate::filter::parse_number;
use crate::{Cell, LabeledTable, Result, MISSING};
use itertools::Itertools;
use log::{info, warn};

/// Significant figures kept by [`LabeledTable::unfloat`].
pub const SIG_FIGS: usize = 6;

impl LabeledTable<String> {
    /// Parses every value as a number.
    ///
    /// The missing sentinel becomes [`f64::NAN`], which is also the missing sentinel of the
    /// returned table.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) if any other value is not a number.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1.5", "#N/A"]])?;
    /// let numeric = table.to_float()?;
    /// assert_eq!(numeric.get("A", "x")?, 1.5);
    /// assert!(numeric.get("A", "y")?.is_nan());
    ///
    /// let text = LabeledTable::from_rows([["#", "x"], ["A", "one"]])?;
    /// assert!(text.to_float().is_err());
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn to_float(&self) -> Result<LabeledTable<f64>> {
        let missing = self.missing.clone();
        self.try_map_cells(|value| if *value == missing { Ok(f64::NAN) } else { parse_number(value) })
    }

    /// Returns the values as a rectangular array of numbers, in row-major order.
    pub fn to_numeric_array(&self) -> Result<Vec<Vec<f64>>> {
        Ok(self.to_float()?.data)
    }

    /// Replaces values that are empty or only whitespace with the missing sentinel.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    /// let mut table = LabeledTable::from_rows([["#", "x", "y"], ["A", " ", "1"]])?;
    /// table.blank_to_na();
    /// assert_eq!(table.row("A")?, ["#N/A", "1"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn blank_to_na(&mut self) {
        let missing = self.missing.clone();
        self.apply_to_cells(|value| if value.trim().is_empty() { missing.clone() } else { value.clone() });
    }
}

impl<T: Cell> LabeledTable<T> {
    /// Replaces every missing value with `value`.
    pub fn na_to_value(&mut self, value: T) {
        let missing = self.missing.clone();
        self.apply_to_cells(|v| if v.is_missing(&missing) { value.clone() } else { v.clone() });
    }
}

impl LabeledTable<f64> {
    /// Formats every value to [`SIG_FIGS`] significant figures.
    ///
    /// Exact zeros become `0` and [`f64::NAN`] becomes the text missing sentinel.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let table = LabeledTable::new(vec!["A".into()], vec!["x".into(), "y".into(), "z".into()], vec![vec![0.0, 1.0 / 3.0, f64::NAN]])?;
    /// assert_eq!(table.unfloat().row("A")?, ["0", "0.333333", "#N/A"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn unfloat(&self) -> LabeledTable<String> {
        self.map_cells(|&value| {
            if value.is_nan() {
                MISSING.to_string()
            } else if value == 0.0 {
                "0".to_string()
            } else {
                format_general(value, SIG_FIGS)
            }
        })
    }

    /// Scales every column to sum to 1.
    ///
    /// Missing values ([`f64::NAN`]) are left out of the sum and stay missing. Columns whose sum
    /// is not positive become all zeros.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut table = LabeledTable::new(
    ///     vec!["A".into(), "B".into()],
    ///     vec!["x".into(), "y".into()],
    ///     vec![vec![1.0, 0.0], vec![3.0, 0.0]],
    /// )?;
    /// table.normalize_columns();
    /// assert_eq!(table.col("x")?, [0.25, 0.75]);
    /// assert_eq!(table.col("y")?, [0.0, 0.0]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn normalize_columns(&mut self) {
        for j in 0..self.n_cols() {
            let total: f64 = self.data.iter().map(|row| row[j]).filter(|v| !v.is_nan()).sum();
            if total > 0.0 {
                self.data.iter_mut().for_each(|row| row[j] /= total);
            } else {
                warn!("{} :: sum of column {} ({j}) is {total}", self.source, self.col_labels[j]);
                self.data.iter_mut().filter(|row| !row[j].is_nan()).for_each(|row| row[j] = 0.0);
            }
        }
        info!("{} :: normalized the columns", self.source);
    }

    /// Replaces every value with its 1-based rank within its column.
    ///
    /// Tied values share the average of their ranks. If `normalize`, ranks are divided by the
    /// largest rank in the column. Missing values ([`f64::NAN`]) are not ranked and stay missing.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut table = LabeledTable::new(
    ///     vec!["A".into(), "B".into(), "C".into()],
    ///     vec!["x".into()],
    ///     vec![vec![10.0], vec![5.0], vec![10.0]],
    /// )?;
    /// table.rank_columns(false);
    /// assert_eq!(table.col("x")?, [2.5, 1.0, 2.5]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn rank_columns(&mut self, normalize: bool) {
        for j in 0..self.n_cols() {
            let values = self.data.iter().map(|row| row[j]).collect_vec();
            let mut ranks = average_ranks(&values);
            if normalize {
                let max = ranks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                ranks.iter_mut().for_each(|rank| *rank /= max);
            }
            self.data.iter_mut().zip(ranks).for_each(|(row, rank)| row[j] = rank);
        }
        info!("{} :: ranked the columns", self.source);
    }
}

/// Returns the 1-based rank of each value, with ties sharing their average rank.
///
/// NaN values are skipped and ranked NaN.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let order = (0..values.len())
        .filter(|&i| !values[i].is_nan())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect_vec();
    let mut ranks = vec![f64::NAN; values.len()];

    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 through end
        let rank = (start + 1 + end) as f64 / 2.0;
        order[start..end].iter().for_each(|&i| ranks[i] = rank);
        start = end;
    }
    ranks
}

/// Formats a number like C's `%.{precision}g`: the shorter of fixed and scientific notation,
/// with trailing zeros removed.
///
/// ```
/// use tabkit_table::numeric::format_general;
///
/// assert_eq!(format_general(0.5, 6), "0.5");
/// assert_eq!(format_general(1234567.0, 6), "1.23457e+06");
/// assert_eq!(format_general(0.00001, 6), "1e-05");
/// assert_eq!(format_general(-42.0, 6), "-42");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
