//! trackgen runtime.
//!
//! Traits and change-set types referenced by the `clone.rs` and `diff.rs` artifacts that
//! `trackgen-build` writes, plus `#[derive(Tracked)]` for column metadata.

extern crate self as trackgen;

mod changes;
mod deleted_at;
mod errors;
mod temporal;
mod tracked;

pub use changes::{Change, Changes, MergeDirective, is_canonical_empty};
pub use deleted_at::DeletedAt;
pub use errors::DiffError;
pub use temporal::Temporal;
pub use tracked::{FieldColumn, Tracked};
pub use trackgen_macros::Tracked;

/// Independent copy of a value: nested documents and collections of them share no storage
/// with the original.
pub trait DeepClone {
    fn deep_clone(&self) -> Self;
}

/// Minimal change set between two versions of a value.
pub trait Diff {
    /// Changes turning `self` (previous) into `next`; values are taken from `next`.
    ///
    /// An empty set means the two are equivalent.
    fn diff(&self, next: &Self) -> Result<Changes, DiffError>;
}

/// Diff two optional values. Returns `Ok(None)` when either side is missing, since there is
/// nothing to compare against.
pub fn diff<T: Diff>(previous: Option<&T>, next: Option<&T>) -> Result<Option<Changes>, DiffError> {
    match (previous, next) {
        (Some(previous), Some(next)) => previous.diff(next).map(Some),
        _ => Ok(None),
    }
}
