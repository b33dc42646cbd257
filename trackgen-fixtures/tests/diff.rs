//! Generated `Diff` impls: minimal change sets, nested mappings and merge directives.

mod common;

use std::collections::HashMap;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use common::{address, person, person_with_chain, service, team};
use serde_json::{Value, json};
use trackgen::{Change, DeletedAt, Diff, MergeDirective, Tracked};
use trackgen_fixtures::models::{Job, Schedule, ServiceData, ServiceStatus};
use uuid::Uuid;

fn service_data() -> ServiceData {
    ServiceData {
        sync_count: 1,
        status: Some(ServiceStatus {
            mode: "active".to_string(),
            healthy: true,
        }),
        last_seen_at: None,
        endpoints: Vec::new(),
    }
}

fn merge(change: Option<&Change>) -> &MergeDirective {
    change.and_then(Change::as_merge).expect("a merge directive")
}

#[test]
fn test_identical_values_have_no_changes() {
    assert!(person_with_chain("Linus").diff(&person_with_chain("Linus")).unwrap().is_empty());
    assert!(team().diff(&team()).unwrap().is_empty());

    let mut previous = service();
    previous.payload = Some(service_data());
    previous.settings = Some(HashMap::from([("theme".to_string(), "dark".to_string())]));
    assert!(previous.diff(&previous.clone()).unwrap().is_empty());
}

#[test]
fn scenario_a_single_primitive_change() {
    let previous = address("Anytown");
    let next = address("Newtown");

    let changes = previous.diff(&next).unwrap();
    assert_eq!(changes.to_json().unwrap(), json!({ "city": "Newtown" }));
}

#[test]
fn scenario_b_change_inside_nested_pointer() {
    let mut previous = person("Linus", 30);
    previous.manager = Some(Box::new(person("Grace", 45)));
    let mut next = previous.clone();
    next.manager.as_mut().unwrap().age = 46;

    let changes = previous.diff(&next).unwrap();
    assert_eq!(changes.to_json().unwrap(), json!({ "manager": { "age": 46 } }));
    assert!(changes.get("manager").unwrap().as_nested().is_some());
}

#[test]
fn test_changes_only_mention_differing_fields() {
    let previous = team();
    let mut next = team();
    next.tags.push("payments".to_string());
    next.scores.insert("velocity".to_string(), 43);

    let changes = previous.diff(&next).unwrap();
    assert_eq!(changes.keys().collect::<Vec<_>>(), vec!["scores", "tags"]);
    assert_eq!(changes.get("tags").unwrap().as_value(), Some(&json!(["infra", "payments"])));
    assert_eq!(changes.get("scores").unwrap().as_value(), Some(&json!({ "velocity": 43 })));
}

#[test]
fn test_nested_changes_several_levels_deep() {
    let previous = person_with_chain("Linus");
    let mut next = previous.clone();
    next.manager.as_mut().unwrap().manager.as_mut().unwrap().address.city = "Newtown".to_string();

    let changes = previous.diff(&next).unwrap();
    assert_eq!(
        changes.to_json().unwrap(),
        json!({ "manager": { "manager": { "address": { "city": "Newtown" } } } })
    );
}

#[test]
fn test_nested_pointer_appearing_and_disappearing() {
    let previous = person("Linus", 30);
    let mut next = previous.clone();
    next.manager = Some(Box::new(person("Grace", 45)));

    let appeared = previous.diff(&next).unwrap();
    let value = appeared.get("manager").unwrap().as_value().unwrap();
    assert_eq!(value["name"], json!("Grace"));
    assert_eq!(value["address"]["city"], json!("Anytown"));

    let disappeared = next.diff(&previous).unwrap();
    assert_eq!(disappeared.get("manager").unwrap().as_value(), Some(&Value::Null));
}

#[test]
fn test_optional_nested_document_by_value() {
    let previous = team();
    let mut next = team();
    next.lead.as_mut().unwrap().age = 41;
    next.members[2].as_mut().unwrap().age = 51;

    let changes = previous.diff(&next).unwrap();
    assert_eq!(changes.get("lead").unwrap().to_owned(), {
        let mut lead = trackgen::Changes::new();
        lead.record_value("age", &41u32).unwrap();
        Change::Nested(lead)
    });
    // collections are compared whole
    assert!(changes.get("members").unwrap().as_value().unwrap().is_array());
}

#[test]
fn test_temporal_fields() {
    let previous = team();
    let mut next = team();
    next.founded_at = previous.founded_at + Duration::zero();
    assert!(previous.diff(&next).unwrap().is_empty());

    next.archived_at = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let changes = previous.diff(&next).unwrap();
    assert_eq!(changes.get("archived_at").unwrap().as_value(), Some(&json!("2025-01-01T00:00:00Z")));

    let cleared = next.diff(&previous).unwrap();
    assert_eq!(cleared.get("archived_at").unwrap().as_value(), Some(&Value::Null));
}

#[test]
fn test_identifier_soft_delete_and_relation() {
    let previous = service();
    let mut next = service();
    next.parent_id = Some(Uuid::from_u128(7));
    next.deleted_at = DeletedAt::at(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());
    next.owner = Some(Box::new(person("Linus", 30)));

    let changes = previous.diff(&next).unwrap();
    assert_eq!(changes.keys().collect::<Vec<_>>(), vec!["parent_id", "owner", "deleted_at"]);
    assert_eq!(
        changes.get("parent_id").unwrap().as_value(),
        Some(&json!("00000000-0000-0000-0000-000000000007"))
    );
    assert_eq!(changes.get("deleted_at").unwrap().as_value(), Some(&json!("2024-07-01T00:00:00Z")));
    // relations are never traversed, only replaced
    assert_eq!(changes.get("owner").unwrap().as_value().unwrap()["name"], json!("Linus"));
}

#[test]
fn scenario_c_document_from_absent() {
    let previous = service();

    let mut next = service();
    next.settings = Some(HashMap::from([("theme".to_string(), "dark".to_string())]));
    let changes = previous.diff(&next).unwrap();
    let directive = merge(changes.get("settings"));
    assert_eq!(directive.column, "settings");
    assert_eq!(directive.patch, "{\"theme\":\"dark\"}");

    let mut empty = service();
    empty.settings = Some(HashMap::new());
    let changes = previous.diff(&empty).unwrap();
    assert!(!changes.contains_key("settings"));
    assert!(changes.is_empty());
}

#[test]
fn test_document_cleared_is_null() {
    let mut previous = service();
    previous.settings = Some(HashMap::from([("theme".to_string(), "dark".to_string())]));
    previous.payload = Some(service_data());

    let changes = previous.diff(&service()).unwrap();
    assert_eq!(changes.get("settings").unwrap().as_value(), Some(&Value::Null));
    assert_eq!(changes.get("payload").unwrap().as_value(), Some(&Value::Null));
}

#[test]
fn test_embedded_document_merges_whole_value_when_new() {
    let previous = service();
    let mut next = service();
    next.payload = Some(service_data());

    let changes = previous.diff(&next).unwrap();
    let directive = merge(changes.get("payload"));
    assert_eq!(directive.column, "data");
    assert_eq!(directive.expression(), "\"data\" || ?");
    assert_eq!(
        directive.patch_json().unwrap(),
        json!({
            "syncCount": 1,
            "status": { "mode": "active", "healthy": true },
            "lastSeen": null,
            "endpoints": []
        })
    );
}

#[test]
fn test_embedded_document_merges_only_changed_attributes() {
    let mut previous = service();
    previous.payload = Some(service_data());

    let mut next = previous.clone();
    let data = next.payload.as_mut().unwrap();
    data.sync_count = 2;
    data.status.as_mut().unwrap().mode = "degraded".to_string();

    let changes = previous.diff(&next).unwrap();
    let directive = merge(changes.get("payload"));
    assert_eq!(directive.column, "data");
    assert_eq!(directive.patch, "{\"syncCount\":2,\"status\":{\"mode\":\"degraded\"}}");
}

#[test]
fn test_empty_document_patch_is_suppressed() {
    let mut previous = service();
    previous.labels = vec!["eu".to_string()];

    // cleared to [] serializes canonical-empty, so nothing is recorded
    let changes = previous.diff(&service()).unwrap();
    assert!(changes.is_empty());

    let changes = service().diff(&previous).unwrap();
    let directive = merge(changes.get("labels"));
    assert_eq!(directive.column, "labels_json");
    assert_eq!(directive.patch, "[\"eu\"]");
}

#[test]
fn test_change_keys_map_to_columns() {
    let previous = service();
    let mut next = service();
    next.name = "invoicing".to_string();
    next.payload = Some(service_data());

    let changes = previous.diff(&next).unwrap();
    let columns = changes.by_column::<trackgen_fixtures::models::Service>().unwrap();
    assert_eq!(columns.keys().copied().collect::<Vec<_>>(), vec!["name", "data"]);
    assert_eq!(
        <ServiceData as Tracked>::column_for("lastSeen"),
        Some("last_seen_at")
    );
}

#[test]
fn test_missing_operand_is_undefined() {
    let present = team();
    assert!(trackgen::diff(None, Some(&present)).unwrap().is_none());
    assert!(trackgen::diff(Some(&present), None).unwrap().is_none());
    assert!(trackgen::diff(Some(&present), Some(&present)).unwrap().unwrap().is_empty());
}

fn job(offset_hours: i32) -> Job {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
    let schedule = Schedule {
        next_run_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().with_timezone(&offset),
        label: "nightly".to_string(),
    };
    Job {
        name: "reindex".to_string(),
        previous: Some(schedule.clone()),
        schedule,
    }
}

#[test]
fn test_same_instant_in_document_is_suppressed_despite_different_encoding() {
    let previous = job(0);
    let next = job(2);
    assert_ne!(
        serde_json::to_string(&previous.schedule).unwrap(),
        serde_json::to_string(&next.schedule).unwrap()
    );

    assert!(previous.diff(&next).unwrap().is_empty());

    let mut moved = next.clone();
    moved.schedule.next_run_at = moved.schedule.next_run_at + Duration::hours(1);
    moved.previous.as_mut().unwrap().label = "weekly".to_string();
    let changes = previous.diff(&moved).unwrap();
    assert_eq!(changes.keys().collect::<Vec<_>>(), vec!["schedule", "previous"]);
    assert_eq!(
        merge(changes.get("schedule")).patch,
        "{\"nextRunAt\":\"2024-01-01T03:00:00+02:00\"}"
    );
    let directive = merge(changes.get("previous"));
    assert_eq!(directive.column, "previous_schedule");
    assert_eq!(directive.patch, "{\"label\":\"weekly\"}");
}
