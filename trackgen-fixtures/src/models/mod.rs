mod address;
mod job;
mod person;
mod service;
mod team;

pub use address::Address;
pub use job::{Job, Schedule};
pub use person::Person;
pub use service::{Service, ServiceData, ServiceStatus};
pub use team::{Team, Visibility};

mod generated_clone {
    include!(concat!(env!("OUT_DIR"), "/clone.rs"));
}

mod generated_diff {
    include!(concat!(env!("OUT_DIR"), "/diff.rs"));
}
