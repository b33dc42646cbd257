/// Storage mapping for one field, emitted by `#[derive(Tracked)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldColumn {
    /// Rust field name.
    pub field: &'static str,
    /// Key the field's changes are recorded under.
    pub key: &'static str,
    /// Storage column.
    pub column: &'static str,
}

/// Field-to-column metadata for a struct with generated diff routines.
pub trait Tracked {
    const COLUMNS: &'static [FieldColumn];

    /// Column for a change key.
    fn column_for(key: &str) -> Option<&'static str> {
        Self::COLUMNS.iter().find(|column| column.key == key).map(|column| column.column)
    }
}
