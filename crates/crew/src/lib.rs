//! Crew roster domain module.
//!
//! Each crew kind is a plain record plus a static field table that drives
//! validation and storage. No IO, no HTTP, no SQL.

pub mod common;
pub mod deceased;
pub mod doctor;
pub mod fighter;
pub mod resource;
pub mod shipwright;

pub use common::SHIPS;
pub use deceased::Deceased;
pub use doctor::Doctor;
pub use fighter::Fighter;
pub use resource::{CrewResource, ensure_body_id, merge_update, validate_new};
pub use shipwright::Shipwright;
