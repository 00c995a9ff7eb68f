//! Export error type.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors from [`SampleTracker::export`](crate::SampleTracker::export).
///
/// `NoData` is warning-grade: the run simply produced nothing to
/// write. `Io` is a genuine failure (permissions, disk).
#[derive(Debug)]
pub enum ExportError {
    /// No enabled quantity had any samples to write.
    NoData,
    /// Filesystem failure while creating the directory or writing.
    Io(io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "no data to export"),
            Self::Io(e) => write!(f, "export failed: {e}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::NoData => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
