//! Read and write [`LabeledTable`] as tab-delimited text.

use crate::{Cell, Error, LabeledTable, Result, ORIGIN};
use itertools::Itertools;
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const DELIMITER: u8 = b'\t';

impl LabeledTable<String> {
    /// Read a tab-delimited file into a [`LabeledTable`].
    ///
    /// The first row is the header: its first cell becomes the [origin](LabeledTable::origin) and
    /// the remaining cells become the column labels. The first cell of every other row is its row
    /// label.
    ///
    /// ## Examples
    ///
    /// ```
    /// use std::io::Write;
    /// use tabkit_table::LabeledTable;
    ///
    /// let mut file = tempfile::NamedTempFile::new().unwrap();
    /// writeln!(file, "#\t1\t2\nA\t0\t1\nB\t1\t0").unwrap();
    ///
    /// let table = LabeledTable::from_file(file.path())?;
    /// assert_eq!(table.row_labels(), ["A", "B"]);
    /// assert_eq!(table.col_labels(), ["1", "2"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn from_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path> + Debug,
    {
        let name = format!("<{}>", path.as_ref().display());
        let file = File::open(&path).map_err(|e| Error::file_io(path.as_ref().display(), e))?;
        Self::from_reader(file, &name)
    }

    /// Read tab-delimited text from any reader (ex. [`std::io::stdin`]) into a [`LabeledTable`].
    ///
    /// `name` identifies the reader in log messages and errors.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Format`] if there is no header, or if any row has a different number of
    /// values than the header has column labels.
    ///
    /// ```
    /// use tabkit_table::{Error, LabeledTable};
    ///
    /// let text = "#\tx\ty\nA\t1\t2\n";
    /// let table = LabeledTable::from_reader(text.as_bytes(), "<text>")?;
    /// assert_eq!(table.get("A", "y")?, "2");
    ///
    /// let ragged = "#\tx\ty\nA\t1\n";
    /// let result = LabeledTable::from_reader(ragged.as_bytes(), "<text>");
    /// assert!(matches!(result, Err(Error::Format { .. })));
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let rows = reader
            .records()
            .map(|record| {
                let record = record.map_err(|e| Error::file_io(name, e))?;
                Ok(record.iter().map(String::from).collect_vec())
            })
            .collect::<Result<Vec<_>>>()?;

        Self::load_rows(name, rows)
    }

    /// Returns a new [`LabeledTable`] from rows of values, where the first row is the header and
    /// the first value of every row is its label.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let table = LabeledTable::from_rows(vec![
    ///     vec!["!", "1", "2"],
    ///     vec!["A", "X", "Y"],
    /// ])?;
    /// assert_eq!(table.origin(), "!");
    /// assert_eq!(table.row("A")?, ["X", "Y"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn from_rows<I, R, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows.into_iter().map(|row| row.into_iter().map(Into::into).collect_vec()).collect_vec();
        Self::load_rows("<rows>", rows)
    }

    fn load_rows(name: &str, rows: Vec<Vec<String>>) -> Result<Self> {
        // a lone "" field is still a labeled row
        let mut rows = rows.into_iter().filter(|row| !row.is_empty());

        let mut header = rows.next().ok_or_else(|| Error::Format {
            table: name.to_string(),
            reason: "Table has no header row.".to_string(),
        })?;
        let origin = header.remove(0);
        let col_labels = header;

        let mut row_labels = Vec::new();
        let mut data = Vec::new();
        for (i, mut row) in rows.enumerate() {
            let label = row.remove(0);
            if row.len() != col_labels.len() {
                return Err(Error::Format {
                    table: name.to_string(),
                    reason: format!(
                        "Row {} ('{label}') has {} values, but the header has {} column labels.",
                        i + 2,
                        row.len(),
                        col_labels.len()
                    ),
                });
            }
            row_labels.push(label);
            data.push(row);
        }

        Self::assemble(name, origin, String::missing(), row_labels, col_labels, data)
    }
}

impl<T: Cell> LabeledTable<T> {
    /// Returns a new [`LabeledTable`] from a nested mapping of row label, then column label, to
    /// value.
    ///
    /// - If `row_labels` is [`None`], the rows are the sorted outer keys.
    /// - If `col_labels` is [`None`], the columns are the sorted union of the inner keys.
    /// - Combinations absent from the mapping are filled with the [missing](Cell::missing)
    ///   sentinel.
    ///
    /// ## Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use tabkit_table::LabeledTable;
    ///
    /// let mapping = HashMap::from([
    ///     ("A", HashMap::from([("1", "1".to_string()), ("2", "0".to_string())])),
    ///     ("B", HashMap::from([("2", "0".to_string()), ("3", "1".to_string())])),
    /// ]);
    ///
    /// let table = LabeledTable::from_nested_mapping(mapping.clone(), None, None)?;
    /// assert_eq!(table.col_labels(), ["1", "2", "3"]);
    /// assert_eq!(table.row("B")?, ["#N/A", "0", "1"]);
    ///
    /// let rows = Some(vec!["B".to_string(), "A".to_string()]);
    /// let table = LabeledTable::from_nested_mapping(mapping, rows, None)?;
    /// assert_eq!(table.row_labels(), ["B", "A"]);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn from_nested_mapping<M, R, I, C>(
        mapping: M,
        row_labels: Option<Vec<String>>,
        col_labels: Option<Vec<String>>,
    ) -> Result<Self>
    where
        M: IntoIterator<Item = (R, I)>,
        R: Into<String>,
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
    {
        let mut nested: BTreeMap<String, HashMap<String, T>> = BTreeMap::new();
        for (row, inner) in mapping {
            nested.entry(row.into()).or_default().extend(inner.into_iter().map(|(col, value)| (col.into(), value)));
        }

        let row_labels = row_labels.unwrap_or_else(|| nested.keys().cloned().collect());
        let col_labels = col_labels.unwrap_or_else(|| {
            nested.values().flat_map(|inner| inner.keys().cloned()).collect::<BTreeSet<_>>().into_iter().collect()
        });

        let missing = T::missing();
        let data = row_labels
            .iter()
            .map(|row| {
                let inner = nested.get(row);
                col_labels
                    .iter()
                    .map(|col| inner.and_then(|inner| inner.get(col)).cloned().unwrap_or_else(|| missing.clone()))
                    .collect()
            })
            .collect();

        Self::assemble("<nested mapping>", ORIGIN.to_string(), missing, row_labels, col_labels, data)
    }

    /// Write the [`LabeledTable`] as tab-delimited text to a file, or to stdout if `path` is
    /// [`None`].
    ///
    /// ## Examples
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let table = LabeledTable::from_rows([["#", "1", "2"], ["A", "a", "b"]])?;
    /// let file = tempfile::NamedTempFile::new().unwrap();
    /// table.write(Some(file.path()))?;
    ///
    /// let observed = LabeledTable::from_file(file.path())?;
    /// assert_eq!(observed, table);
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let file = File::create(path).map_err(|e| Error::file_io(path.display(), e))?;
                self.write_to(file).map_err(|e| match e {
                    Error::FileIo { source, .. } => Error::FileIo { file: path.display().to_string(), source },
                    e => e,
                })?;
                debug!("{} :: Wrote table to {path:?}.", self.source);
                Ok(())
            }
            None => self.write_to(std::io::stdout().lock()),
        }
    }

    /// Write the [`LabeledTable`] as tab-delimited text to any writer.
    ///
    /// ```
    /// use tabkit_table::LabeledTable;
    ///
    /// let table = LabeledTable::from_rows([["#", "1", "2"], ["A", "a", "b"]])?;
    /// let mut buffer = Vec::new();
    /// table.write_to(&mut buffer)?;
    /// assert_eq!(String::from_utf8(buffer).unwrap(), "#\t1\t2\nA\ta\tb\n");
    /// # Ok::<(), tabkit_table::Error>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);

        let header = std::iter::once(self.origin.as_str()).chain(self.col_labels.iter().map(String::as_str));
        writer.write_record(header).map_err(|e| Error::file_io("<writer>", e))?;

        for (label, row) in self.iter_rows() {
            let record = std::iter::once(label.to_string()).chain(row.iter().map(ToString::to_string));
            writer.write_record(record).map_err(|e| Error::file_io("<writer>", e))?;
        }

        writer.flush().map_err(|e| Error::file_io("<writer>", e))?;
        Ok(())
    }
}
