//! Infrastructure layer: SQLite database, repositories, credential lookup.

pub mod crew_store;
pub mod db;
pub mod users;

pub use crew_store::{CrewStore, ListQuery};
pub use db::{Database, StoreError};
pub use users::{NewUser, SqliteCredentialStore, UserRecord, UserRepository, seed_default_users};
