//! Errors raised by [`LabeledTable`](crate::LabeledTable) operations.

use std::fmt::{Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

/// The axis of a [`LabeledTable`](crate::LabeledTable).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    Row,
    Col,
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "col"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An unknown label or out-of-range position was used to address the table.
    #[error("{table} :: Bad {axis} index <{index}>.")]
    BadIndex { table: String, axis: Axis, index: String },

    /// The table could not be assembled from its input.
    #[error("{table} :: Malformed table: {reason}")]
    Format { table: String, reason: String },

    /// A filter criterion or cell value could not be parsed.
    #[error("Could not parse \"{string}\" as {context}: {reason}")]
    Parse { string: String, context: &'static str, reason: String },

    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo { file: String, source: Box<dyn std::error::Error + Send + Sync> },
}

impl Error {
    pub(crate) fn file_io<E>(file: impl Display, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::FileIo { file: file.to_string(), source: Box::new(source) }
    }

    /// Swaps the axis of a [`Error::BadIndex`], for errors raised on a transposed table.
    pub(crate) fn flip_axis(self) -> Self {
        match self {
            Error::BadIndex { table, axis, index } => {
                let axis = match axis {
                    Axis::Row => Axis::Col,
                    Axis::Col => Axis::Row,
                };
                Error::BadIndex { table, axis, index }
            }
            error => error,
        }
    }
}
