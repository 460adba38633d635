use std::fmt;

use nc_groups::RegistryError;
use polars::prelude::PolarsError;
use thiserror::Error;

use crate::Conversion;

/// Which program text a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Program,
    InitialState,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program => f.write_str("program"),
            Self::InitialState => f.write_str("initial state"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{origin} line {line_no}, column {column}: {message} (token '{token}')")]
    MalformedLine {
        origin: Source,
        line_no: usize,
        column: usize,
        token: String,
        message: String,
    },

    #[error("invalid axis configuration '{axis}': {reason}")]
    UnknownAxisConfiguration { axis: String, reason: String },

    #[error("iteration limit of {limit} rows exceeded at line {line_no}")]
    IterationLimitExceeded {
        limit: usize,
        line_no: usize,
        /// Everything converted before the limit was hit.
        partial: Box<Conversion>,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("table error: {0}")]
    Table(#[from] PolarsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
