use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use trackgen::Tracked;

/// When and how a job runs, stored as a JSON document.
///
/// @jsonb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tracked)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub next_run_at: DateTime<FixedOffset>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tracked)]
pub struct Job {
    pub name: String,
    #[tracked(json)]
    pub schedule: Schedule,
    #[tracked(json, column = "previous_schedule")]
    pub previous: Option<Schedule>,
}
