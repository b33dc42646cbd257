use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trackgen::{DeletedAt, Tracked};
use uuid::Uuid;

use super::Person;

/// Runtime state stored inside the `data` column.
///
/// @jsonb
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tracked)]
#[serde(rename_all = "camelCase")]
pub struct ServiceData {
    pub sync_count: u32,
    #[tracked(json)]
    pub status: Option<ServiceStatus>,
    #[serde(rename = "lastSeen")]
    pub last_seen_at: Option<DateTime<Utc>>,
    pub endpoints: Vec<String>,
}

/// @jsonb
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tracked)]
pub struct ServiceStatus {
    pub mode: String,
    pub healthy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tracked)]
pub struct Service {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    #[tracked(json, column = "data")]
    pub payload: Option<ServiceData>,
    #[tracked(json)]
    pub settings: Option<HashMap<String, String>>,
    #[tracked(json, column = "labels_json")]
    pub labels: Vec<String>,
    #[tracked(relation)]
    pub owner: Option<Box<Person>>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: DeletedAt,
}
