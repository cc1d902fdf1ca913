use fleetroster_crew::{Deceased, Doctor, Fighter, Shipwright};
use fleetroster_infra::{CrewStore, Database, UserRepository};

use crate::registry::RouteRegistry;

pub mod crew;
pub mod users;

/// Register every controller against `db`.
pub fn register_all(registry: &mut RouteRegistry, db: &Database) {
    crew::register(registry, "/fighters", CrewStore::<Fighter>::new(db));
    crew::register(registry, "/doctors", CrewStore::<Doctor>::new(db));
    crew::register(registry, "/shipwrights", CrewStore::<Shipwright>::new(db));
    crew::register(registry, "/deceased", CrewStore::<Deceased>::new(db));
    users::register(registry, UserRepository::new(db));
}
