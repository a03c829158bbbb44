use std::path::PathBuf;

use thiserror::Error;

use crate::pbm::PbmKind;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({col}, {row}) is outside a {width}x{height} grid")]
    IndexOutOfRange {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },

    #[error("grid is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("pixel stream holds {actual} values, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum PbmError {
    #[error("input is a {0} image, not a bi-level bitmap")]
    InvalidFormat(PbmKind),

    #[error("malformed PBM: {0}")]
    Malformed(String),

    #[error("pixel data ended after {got} of {expected} values")]
    Truncated { expected: usize, got: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fatal conditions of a full unblackedges run.
#[derive(Debug, Error)]
pub enum UnblackError {
    #[error("More than one argument given ({0} paths)")]
    InvalidArgumentCount(usize),

    #[error("Error opening file {}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Given file is not a valid .pbm (found {0})")]
    InvalidFormat(PbmKind),

    #[error(transparent)]
    Pbm(PbmError),

    #[error("writing output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PbmError> for UnblackError {
    fn from(err: PbmError) -> Self {
        match err {
            PbmError::InvalidFormat(kind) => UnblackError::InvalidFormat(kind),
            other => UnblackError::Pbm(other),
        }
    }
}
