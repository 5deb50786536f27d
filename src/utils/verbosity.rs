use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
///
/// Displays in lowercase, the form `RUST_LOG` expects.
///
/// ```
/// use tabkit::Verbosity;
/// assert_eq!(Verbosity::Debug.to_string(), "debug");
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, PartialEq, Serialize, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Verbosity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}
