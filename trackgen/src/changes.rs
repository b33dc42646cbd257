//! Change sets produced by generated diff routines.

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::DiffError;
use crate::tracked::Tracked;

/// Serialized forms treated as "no content" for document columns.
const CANONICAL_EMPTY: [&str; 3] = ["{}", "[]", "null"];

/// Whether serialized document text is an empty object, an empty array or `null`.
pub fn is_canonical_empty(text: &str) -> bool {
    CANONICAL_EMPTY.contains(&text.trim())
}

/// Instruction to merge a JSON patch into an existing document column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeDirective {
    /// Storage column receiving the patch.
    pub column: String,
    /// Serialized patch, never canonical-empty.
    pub patch: String,
}

impl MergeDirective {
    pub fn new(column: impl Into<String>, patch: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            patch: patch.into(),
        }
    }

    /// Update expression with a single bind parameter for the patch: `"column" || ?`.
    pub fn expression(&self) -> String {
        format!("\"{}\" || ?", self.column.replace('"', "\"\""))
    }

    /// The patch parsed back into a JSON value.
    pub fn patch_json(&self) -> Result<serde_json::Value, DiffError> {
        Ok(serde_json::from_str(&self.patch)?)
    }
}

/// One entry of a change set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Change {
    /// New value of a plain attribute; `Null` when an optional attribute became absent.
    Value(serde_json::Value),
    /// Attribute-level changes of a nested document.
    Nested(Changes),
    /// Patch for a document column.
    Merge(MergeDirective),
}

impl Change {
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Change::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Changes> {
        match self {
            Change::Nested(changes) => Some(changes),
            _ => None,
        }
    }

    pub fn as_merge(&self) -> Option<&MergeDirective> {
        match self {
            Change::Merge(directive) => Some(directive),
            _ => None,
        }
    }
}

/// Insertion-ordered mapping from serialization key to [`Change`].
///
/// Keys appear in field declaration order. An empty set means "no differences".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Changes {
    entries: IndexMap<String, Change>,
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Change> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.entries.iter().map(|(key, change)| (key.as_str(), change))
    }

    pub fn insert(&mut self, key: impl Into<String>, change: Change) -> Option<Change> {
        self.entries.insert(key.into(), change)
    }

    /// Record the new value of an attribute.
    pub fn record_value<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), DiffError> {
        let value = serde_json::to_value(value)?;
        self.insert(key, Change::Value(value));
        Ok(())
    }

    /// Record that an attribute became absent.
    pub fn record_null(&mut self, key: &str) {
        self.insert(key, Change::Value(serde_json::Value::Null));
    }

    /// Record a nested document's changes; an empty set records nothing.
    pub fn record_nested(&mut self, key: &str, nested: Changes) {
        if !nested.is_empty() {
            self.insert(key, Change::Nested(nested));
        }
    }

    /// Record a whole document value as a merge patch, unless it serializes canonical-empty.
    pub fn record_document<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        column: &str,
        document: &T,
    ) -> Result<(), DiffError> {
        let patch = serde_json::to_string(document)?;
        self.record_patch(key, column, patch);
        Ok(())
    }

    /// Record attribute-level document changes as a merge patch, unless canonical-empty.
    pub fn record_document_patch(&mut self, key: &str, column: &str, patch: Changes) -> Result<(), DiffError> {
        if patch.is_empty() {
            return Ok(());
        }
        let patch = serde_json::to_string(&patch)?;
        self.record_patch(key, column, patch);
        Ok(())
    }

    fn record_patch(&mut self, key: &str, column: &str, patch: String) {
        if is_canonical_empty(&patch) {
            return;
        }
        self.insert(key, Change::Merge(MergeDirective::new(column, patch)));
    }

    /// The change set as a JSON object; merge directives appear as `{column, patch}`.
    pub fn to_json(&self) -> Result<serde_json::Value, DiffError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Top-level changes keyed by storage column, using `T`'s tracked metadata.
    pub fn by_column<T: Tracked>(&self) -> Result<IndexMap<&'static str, &Change>, DiffError> {
        let mut columns = IndexMap::with_capacity(self.len());
        for (key, change) in self.iter() {
            let column = T::column_for(key).ok_or_else(|| DiffError::UnknownKey { key: key.to_string() })?;
            columns.insert(column, change);
        }
        Ok(columns)
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = (&'a String, &'a Change);
    type IntoIter = indexmap::map::Iter<'a, String, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
