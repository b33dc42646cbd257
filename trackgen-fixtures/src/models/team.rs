use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trackgen::Tracked;

use super::{Address, Person};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tracked)]
pub struct Team {
    pub name: String,
    pub members: Vec<Option<Box<Person>>>,
    pub lead: Option<Person>,
    pub backups: Option<Vec<Person>>,
    pub offices: [Address; 2],
    pub by_city: BTreeMap<String, Address>,
    pub scores: HashMap<String, i64>,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
    pub visibility: Visibility,
    pub founded_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}
