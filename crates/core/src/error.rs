//! Error taxonomy shared by the decoder, the diff engine and the session.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

/// Which of the two compared clouds an error or selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DiffError {
    /// Declared point count does not match the byte length of the stream.
    #[error(
        "badly formatted cloud file: header declares {declared} points ({expected} bytes) but got {actual} bytes"
    )]
    Format {
        declared: i64,
        expected: i64,
        actual: u64,
    },

    /// The file could not be opened or read to the end.
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An in-memory stream failed while being read.
    #[error("could not read cloud stream: {0}")]
    Stream(#[from] io::Error),

    /// The display collaborator could not take the merged cloud.
    #[error("could not present merged cloud: {0}")]
    Sink(#[source] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// No file was chosen for one side. Adapters abort silently on this.
    #[error("no file chosen for cloud {side}")]
    Cancelled { side: Side },
}

impl DiffError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True for both flavours of I/O failure.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Stream(_))
    }
}
