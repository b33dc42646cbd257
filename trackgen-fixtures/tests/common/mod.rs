#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use chrono::{TimeZone, Utc};
use trackgen::DeletedAt;
use trackgen_fixtures::models::{Address, Person, Service, Team, Visibility};
use uuid::Uuid;

pub fn address(city: &str) -> Address {
    Address {
        street: "1 Main St".to_string(),
        city: city.to_string(),
        state: "CA".to_string(),
        zip: "90210".to_string(),
        country: "US".to_string(),
    }
}

pub fn person(name: &str, age: u32) -> Person {
    Person {
        name: name.to_string(),
        age,
        address: address("Anytown"),
        manager: None,
    }
}

/// `name` reporting to a manager who reports to a director.
pub fn person_with_chain(name: &str) -> Person {
    let mut manager = person("Grace", 45);
    manager.manager = Some(Box::new(person("Ada", 60)));
    let mut employee = person(name, 30);
    employee.manager = Some(Box::new(manager));
    employee
}

pub fn team() -> Team {
    Team {
        name: "Platform".to_string(),
        members: vec![Some(Box::new(person_with_chain("Linus"))), None, Some(Box::new(person("Ken", 50)))],
        lead: Some(person("Barbara", 40)),
        backups: Some(vec![person("Dennis", 35)]),
        offices: [address("Anytown"), address("Springfield")],
        by_city: BTreeMap::from([("anytown".to_string(), address("Anytown"))]),
        scores: HashMap::from([("velocity".to_string(), 42)]),
        tags: vec!["infra".to_string()],
        metadata: serde_json::json!({ "tier": 1 }),
        visibility: Visibility::Private,
        founded_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        archived_at: None,
    }
}

pub fn service() -> Service {
    Service {
        id: Uuid::from_u128(0x5eed),
        parent_id: None,
        name: "billing".to_string(),
        payload: None,
        settings: None,
        labels: Vec::new(),
        owner: None,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        deleted_at: DeletedAt::active(),
    }
}
