//! `fleetroster-core` — shared building blocks for the fleet roster.
//!
//! This crate contains **pure domain** primitives (no HTTP, no storage):
//! identifiers, the domain error model, and the declarative field
//! validation engine used by every crew entity.

pub mod error;
pub mod id;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::{RecordId, UserId};
pub use validation::{
    Check, FieldKind, FieldSpec, ID_FIELD, Rule, Violation, compile_patterns, normalize_integers,
    validate_object,
};
