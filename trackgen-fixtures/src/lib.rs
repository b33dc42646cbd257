//! Sample models whose `DeepClone` and `Diff` impls are generated at build time.

pub mod models;
