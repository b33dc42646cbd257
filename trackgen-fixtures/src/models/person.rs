use serde::{Deserialize, Serialize};
use trackgen::Tracked;

use super::Address;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tracked)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub address: Address,
    /// Self-reference through a pointer; generated routines stop at `None`.
    pub manager: Option<Box<Person>>,
}
