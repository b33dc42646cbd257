use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soft-delete marker: `Some(instant)` once a record is deleted.
///
/// Compared with plain equality by generated diff routines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeletedAt(pub Option<DateTime<Utc>>);

impl DeletedAt {
    /// Marker for a record that is not deleted.
    pub const fn active() -> Self {
        Self(None)
    }

    pub fn now() -> Self {
        Self(Some(Utc::now()))
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    pub fn is_deleted(&self) -> bool {
        self.0.is_some()
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl From<Option<DateTime<Utc>>> for DeletedAt {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        Self(value)
    }
}
