use thiserror::Error;

/// Error returned by generated diff routines and [`Changes`](crate::Changes) helpers.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A value or document patch could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A change key has no column in the type's [`Tracked`](crate::Tracked) metadata.
    #[error("no column is mapped for change key '{key}'")]
    UnknownKey { key: String },
}
