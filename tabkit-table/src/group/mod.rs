//! Collapse rows into groups, or split a table into strata.


use crate::{Cell, Key, LabeledTable, Options, Result, RowView};
use itertools::Itertools;
use log::info;
use std::collections::BTreeMap;

impl<T: Cell> LabeledTable<T> {
    /// Groups rows by `key_fn(row label)` and reduces each column of every group with `aggregate`.
    ///
    /// The output rows are the sorted distinct group keys, and the columns are unchanged.
    /// `aggregate` receives the values of one column for all rows in a group, in table order.
    ///
    /// Returns `Some(table)` when [`Options::return_new`] is set, otherwise groups `self` in place
    /// and returns [`None`]. [`Options::invert`] has no effect.
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::{LabeledTable, Options};
    ///
    /// let mut table = LabeledTable::from_rows([["#", "c"], ["s1", "5"], ["s2", "7"], ["t1", "1"]])?;
    ///
    /// table.group_by(
    ///     |label| label[0..1].to_string(),
    ///     |values| {
    ///         let sum: u32 = values.iter().map(|v| v.parse::<u32>().unwrap_or(0)).sum();
    ///         Ok(sum.to_string())
    ///     },
    ///     Options::default(),
    /// )?;
    ///
    /// assert_eq!(table.row_labels(), ["s", "t"]);
    /// assert_eq!(table.col("c")?, ["12", "1"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn group_by<K, A>(&mut self, mut key_fn: K, mut aggregate: A, options: Options) -> Result<Option<Self>>
    where
        K: FnMut(&str) -> String,
        A: FnMut(&[T]) -> Result<T>,
    {
        self.with_orientation(options.transposed, |table| {
            let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (i, label) in table.row_labels.iter().enumerate() {
                groups.entry(key_fn(label)).or_default().push(i);
            }

            let mut row_labels = Vec::with_capacity(groups.len());
            let mut data = Vec::with_capacity(groups.len());
            for (key, members) in groups {
                let row = (0..table.n_cols())
                    .map(|j| {
                        let stack = members.iter().map(|&i| table.data[i][j].clone()).collect_vec();
                        aggregate(&stack)
                    })
                    .collect::<Result<Vec<T>>>()?;
                row_labels.push(key);
                data.push(row);
            }

            info!("{} :: grouped {} rows into {} groups", table.source, table.n_rows(), row_labels.len());

            if options.return_new {
                let mut new = table.sibling(row_labels, table.col_labels.clone(), data, table.missing.clone());
                if options.transposed {
                    new.transpose();
                }
                Ok(Some(new))
            } else {
                table.row_labels = row_labels;
                table.data = data;
                table.remap();
                Ok(None)
            }
        })
    }

    /// Splits the table into sub-tables by the distinct values of column `col`.
    ///
    /// Each stratum keeps every column and the rows with that value, in table order.
    /// With [`Options::transposed`], columns are split by the values of row `col` instead.
    ///
    /// ```
    /// use tabkit_table::{LabeledTable, Options};
    ///
    /// let table = LabeledTable::from_rows([["#", "host"], ["A", "cat"], ["B", "dog"], ["C", "cat"]])?;
    /// let strata = table.stratify("host", Options::default())?;
    ///
    /// assert_eq!(strata.keys().collect::<Vec<_>>(), ["cat", "dog"]);
    /// assert_eq!(strata["cat"].row_labels(), ["A", "C"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn stratify<'k>(&self, col: impl Into<Key<'k>>, options: Options) -> Result<BTreeMap<String, Self>> {
        let j = self.field_index(col.into(), options)?;
        self.stratify_by(|row| Ok(row.values()[j].to_string()), options)
    }

    /// Splits the table into sub-tables keyed by `key_fn(row)`.
    pub fn stratify_by<F>(&self, mut key_fn: F, options: Options) -> Result<BTreeMap<String, Self>>
    where
        F: FnMut(&RowView<T>) -> Result<String>,
    {
        let flipped;
        let table = if options.transposed {
            let mut copy = self.clone();
            copy.transpose();
            flipped = copy;
            &flipped
        } else {
            self
        };

        let mut masks: BTreeMap<String, Vec<bool>> = BTreeMap::new();
        for index in 0..table.n_rows() {
            let key = key_fn(&RowView { table, index })
                .map_err(|e| if options.transposed { e.flip_axis() } else { e })?;
            masks.entry(key).or_insert_with(|| vec![false; table.n_rows()])[index] = true;
        }

        info!("{} :: stratified into {} strata {options:?}", self.source, masks.len());

        let strata = masks
            .into_iter()
            .map(|(key, mask)| {
                let mut stratum = table.subset(&mask);
                if options.transposed {
                    stratum.transpose();
                }
                (key, stratum)
            })
            .collect();
        Ok(strata)
    }
}
