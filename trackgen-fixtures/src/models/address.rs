use serde::{Deserialize, Serialize};
use trackgen::Tracked;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tracked)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}
