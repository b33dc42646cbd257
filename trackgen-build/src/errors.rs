use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type returned by the generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A source unit could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source unit is not valid Rust, or carries a malformed `#[tracked]` attribute.
    /// The whole batch is abandoned; no partial registry is produced.
    #[error("failed to parse {unit}: {source}")]
    Parse {
        unit: String,
        #[source]
        source: syn::Error,
    },

    /// Emission could not turn schema metadata into tokens (bad identifier, bad runtime path).
    #[error("template error in {routine}: {message}")]
    Template { routine: String, message: String },

    /// A generated artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A package directory contains no Rust source units.
    #[error("no Rust source files found in {path}")]
    NoSourceUnits { path: PathBuf },
}

impl GenerateError {
    pub(crate) fn parse(unit: impl Into<String>, source: syn::Error) -> Self {
        Self::Parse {
            unit: unit.into(),
            source,
        }
    }

    pub(crate) fn template(routine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            routine: routine.into(),
            message: message.into(),
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
